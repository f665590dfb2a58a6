//! Module: iter::lifecycle
//! Responsibility: exactly-once release hooks attached to an iterator chain.
//! Does not own: the released resource; callbacks close over it.
//! Boundary: `OnFinalise` is the scoped-release wrapper; drop is its fallback path.

use crate::{
    config,
    error::ErrorOrigin,
    iter::{Forwardable, SortedIterator},
    obs::{self, IteratorEvent},
};

///
/// OnConsumed
///
/// Runs its callback once, the first time exhaustion is observed (by
/// `has_next`, or by `next` producing the final element) or on `recycle`,
/// whichever comes first.
///
/// Detecting the final element means `next` checks the upstream for a
/// successor after every item. Over a `Merged` input that check refills
/// the heap straight away, so a following `forward` cannot be batched
/// across the inputs that were still pending.
///

pub struct OnConsumed<I, F> {
    inner: I,
    callback: Option<F>,
}

impl<I, F> OnConsumed<I, F>
where
    I: SortedIterator,
    F: FnOnce(),
{
    pub(crate) const fn new(inner: I, callback: F) -> Self {
        Self {
            inner,
            callback: Some(callback),
        }
    }

    fn fire(&mut self) {
        if let Some(callback) = self.callback.take() {
            obs::record(IteratorEvent::Exhausted {
                origin: ErrorOrigin::Lifecycle,
            });
            callback();
        }
    }
}

impl<I, F> SortedIterator for OnConsumed<I, F>
where
    I: SortedIterator,
    F: FnOnce(),
{
    type Item = I::Item;
    type Order = I::Order;

    fn order(&self) -> &I::Order {
        self.inner.order()
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Lifecycle
    }

    fn has_next(&mut self) -> bool {
        let has_next = self.inner.has_next();
        if !has_next {
            self.fire();
        }

        has_next
    }

    fn peek(&mut self) -> Option<&I::Item> {
        if self.has_next() {
            self.inner.peek()
        } else {
            None
        }
    }

    fn next(&mut self) -> Option<I::Item> {
        let item = self.inner.next();
        if item.is_none() || !self.inner.has_next() {
            self.fire();
        }

        item
    }

    fn recycle(&mut self) {
        self.inner.recycle();
        self.fire();
    }
}

impl<I, F> Forwardable for OnConsumed<I, F>
where
    I: Forwardable,
    F: FnOnce(),
{
    fn last(&self) -> Option<&I::Item> {
        self.inner.last()
    }

    fn forward_unchecked(&mut self, target: &I::Item) {
        self.inner.forward_unchecked(target);
    }
}

///
/// OnFinalise
///
/// Runs its callback once, on `recycle` or when dropped. Dropping without
/// an explicit `recycle` also recycles the upstream; with leak detection
/// enabled that path is logged, since owners are expected to release
/// explicitly.
///

pub struct OnFinalise<I: SortedIterator, F: FnOnce()> {
    inner: I,
    callback: Option<F>,
}

impl<I, F> OnFinalise<I, F>
where
    I: SortedIterator,
    F: FnOnce(),
{
    pub(crate) const fn new(inner: I, callback: F) -> Self {
        Self {
            inner,
            callback: Some(callback),
        }
    }

    /// Whether the release callback has already run.
    #[must_use]
    pub const fn is_finalised(&self) -> bool {
        self.callback.is_none()
    }

    fn finalise(&mut self) {
        self.inner.recycle();
        if let Some(callback) = self.callback.take() {
            callback();
        }
    }
}

impl<I, F> SortedIterator for OnFinalise<I, F>
where
    I: SortedIterator,
    F: FnOnce(),
{
    type Item = I::Item;
    type Order = I::Order;

    fn order(&self) -> &I::Order {
        self.inner.order()
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Lifecycle
    }

    fn has_next(&mut self) -> bool {
        self.inner.has_next()
    }

    fn peek(&mut self) -> Option<&I::Item> {
        self.inner.peek()
    }

    fn next(&mut self) -> Option<I::Item> {
        self.inner.next()
    }

    fn recycle(&mut self) {
        self.finalise();
    }
}

impl<I, F> Forwardable for OnFinalise<I, F>
where
    I: Forwardable,
    F: FnOnce(),
{
    fn last(&self) -> Option<&I::Item> {
        self.inner.last()
    }

    fn forward_unchecked(&mut self, target: &I::Item) {
        self.inner.forward_unchecked(target);
    }
}

impl<I, F> Drop for OnFinalise<I, F>
where
    I: SortedIterator,
    F: FnOnce(),
{
    fn drop(&mut self) {
        if self.is_finalised() {
            return;
        }

        obs::record(IteratorEvent::FinaliserOnDrop {
            origin: ErrorOrigin::Lifecycle,
        });
        if config::current().leak_detection {
            log::debug!(
                "{} iterator dropped without recycle; releasing on drop",
                self.inner.origin()
            );
        }
        self.finalise();
    }
}

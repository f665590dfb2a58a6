//! Module: iter::filtered
//! Responsibility: predicate filtering with eager skipping on `has_next`.
//! Does not own: upstream positioning beyond delegating forwards.
//! Boundary: rejected elements are consumed from the upstream and never surface.

use crate::{
    error::ErrorOrigin,
    iter::{Forwardable, SortedIterator, record_forward},
    order::Order,
};

///
/// Filtered
///

pub struct Filtered<I: SortedIterator, P> {
    inner: I,
    predicate: P,
    last: Option<I::Item>,
}

impl<I, P> Filtered<I, P>
where
    I: SortedIterator,
    P: FnMut(&I::Item) -> bool,
{
    pub(crate) const fn new(inner: I, predicate: P) -> Self {
        Self {
            inner,
            predicate,
            last: None,
        }
    }

    // Drop upstream heads until one passes the predicate.
    fn skip_rejected(&mut self) -> bool {
        while let Some(head) = self.inner.peek() {
            if (self.predicate)(head) {
                return true;
            }
            self.inner.next();
        }

        false
    }
}

impl<I, P> SortedIterator for Filtered<I, P>
where
    I: SortedIterator,
    I::Item: Clone,
    P: FnMut(&I::Item) -> bool,
{
    type Item = I::Item;
    type Order = I::Order;

    fn order(&self) -> &I::Order {
        self.inner.order()
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Filtered
    }

    fn has_next(&mut self) -> bool {
        self.skip_rejected()
    }

    fn peek(&mut self) -> Option<&I::Item> {
        if self.skip_rejected() {
            self.inner.peek()
        } else {
            None
        }
    }

    fn next(&mut self) -> Option<I::Item> {
        if !self.skip_rejected() {
            return None;
        }
        let item = self.inner.next()?;
        self.last = Some(item.clone());

        Some(item)
    }

    fn recycle(&mut self) {
        self.inner.recycle();
    }
}

impl<I, P> Forwardable for Filtered<I, P>
where
    I: Forwardable,
    I::Item: Clone,
    P: FnMut(&I::Item) -> bool,
{
    fn last(&self) -> Option<&I::Item> {
        self.last.as_ref()
    }

    fn forward_unchecked(&mut self, target: &I::Item) {
        // The upstream may already sit past the target on a rejected element.
        let passed = self
            .inner
            .last()
            .is_some_and(|upstream_last| !self.order().precedes(upstream_last, target));
        if passed {
            record_forward(ErrorOrigin::Filtered, false);
            return;
        }

        self.inner.forward_unchecked(target);
    }
}

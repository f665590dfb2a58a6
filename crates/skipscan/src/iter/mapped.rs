//! Module: iter::mapped
//! Responsibility: order-declared projections, with optional seek translation.
//! Does not own: verifying that the projection is monotone beyond assertions.
//! Boundary: forwardable projection maps seek targets back through the reverse function.

use crate::{
    config,
    error::ErrorOrigin,
    iter::{Forwardable, SortedIterator, check_next, record_forward, slot::Slot},
    order::Order,
};

///
/// Mapped
///
/// Applies `f` to every upstream element and declares the result ordered by
/// `order`. The caller guarantees `f` is monotone from the upstream order
/// into `order`; violations trip the order assertion.
///

pub struct Mapped<I, U, F, O2> {
    inner: I,
    f: F,
    order: O2,
    slot: Slot<U>,
    last: Option<U>,
}

impl<I, U, F, O2> Mapped<I, U, F, O2>
where
    I: SortedIterator,
    F: FnMut(I::Item) -> U,
    O2: Order<U>,
    U: Clone,
{
    pub(crate) const fn new(inner: I, f: F, order: O2) -> Self {
        Self {
            inner,
            f,
            order,
            slot: Slot::Unfetched,
            last: None,
        }
    }

    fn fetch(&mut self) {
        fetch_mapped(
            &mut self.inner,
            &mut self.f,
            &self.order,
            &mut self.slot,
            self.last.as_ref(),
        );
    }
}

impl<I, U, F, O2> SortedIterator for Mapped<I, U, F, O2>
where
    I: SortedIterator,
    F: FnMut(I::Item) -> U,
    O2: Order<U>,
    U: Clone,
{
    type Item = U;
    type Order = O2;

    fn order(&self) -> &O2 {
        &self.order
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Mapped
    }

    fn has_next(&mut self) -> bool {
        self.fetch();
        self.slot.buffered().is_some()
    }

    fn peek(&mut self) -> Option<&U> {
        self.fetch();
        self.slot.buffered()
    }

    fn next(&mut self) -> Option<U> {
        self.fetch();
        let item = self.slot.take()?;
        self.last = Some(item.clone());

        Some(item)
    }

    fn recycle(&mut self) {
        self.inner.recycle();
        self.slot = Slot::Done;
    }
}

///
/// MappedForwardable
///
/// Forwardable projection. `reverse` inverts `f` solely to translate a
/// seek target in the projected order back into upstream space.
///

pub struct MappedForwardable<I, U, F, R, O2> {
    inner: I,
    f: F,
    reverse: R,
    order: O2,
    slot: Slot<U>,
    last: Option<U>,
}

impl<I, U, F, R, O2> MappedForwardable<I, U, F, R, O2>
where
    I: Forwardable,
    F: FnMut(I::Item) -> U,
    R: FnMut(&U) -> I::Item,
    O2: Order<U>,
    U: Clone,
{
    pub(crate) const fn new(inner: I, f: F, reverse: R, order: O2) -> Self {
        Self {
            inner,
            f,
            reverse,
            order,
            slot: Slot::Unfetched,
            last: None,
        }
    }

    fn fetch(&mut self) {
        fetch_mapped(
            &mut self.inner,
            &mut self.f,
            &self.order,
            &mut self.slot,
            self.last.as_ref(),
        );
    }
}

impl<I, U, F, R, O2> SortedIterator for MappedForwardable<I, U, F, R, O2>
where
    I: Forwardable,
    F: FnMut(I::Item) -> U,
    R: FnMut(&U) -> I::Item,
    O2: Order<U>,
    U: Clone,
{
    type Item = U;
    type Order = O2;

    fn order(&self) -> &O2 {
        &self.order
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Mapped
    }

    fn has_next(&mut self) -> bool {
        self.fetch();
        self.slot.buffered().is_some()
    }

    fn peek(&mut self) -> Option<&U> {
        self.fetch();
        self.slot.buffered()
    }

    fn next(&mut self) -> Option<U> {
        self.fetch();
        let item = self.slot.take()?;
        self.last = Some(item.clone());

        Some(item)
    }

    fn recycle(&mut self) {
        self.inner.recycle();
        self.slot = Slot::Done;
    }
}

impl<I, U, F, R, O2> Forwardable for MappedForwardable<I, U, F, R, O2>
where
    I: Forwardable,
    F: FnMut(I::Item) -> U,
    R: FnMut(&U) -> I::Item,
    O2: Order<U>,
    U: Clone,
{
    fn last(&self) -> Option<&U> {
        self.last.as_ref()
    }

    fn forward_unchecked(&mut self, target: &U) {
        let satisfied = self.slot.is_done()
            || self
                .slot
                .buffered()
                .is_some_and(|head| self.order.in_order(target, head))
            || self
                .last
                .as_ref()
                .is_some_and(|last| !self.order.precedes(last, target));
        if satisfied {
            record_forward(ErrorOrigin::Mapped, false);
            return;
        }

        let upstream_target = (self.reverse)(target);
        match self.inner.forward(&upstream_target) {
            Ok(()) => {
                self.slot = Slot::Unfetched;
                record_forward(ErrorOrigin::Mapped, true);
            }
            Err(err) => assert!(
                !config::order_checks_enabled(),
                "reverse mapping produced a seek target behind the upstream cursor: {err}"
            ),
        }
    }
}

// Pull and project one upstream element when the slot is empty.
fn fetch_mapped<I, U, F, O2>(
    inner: &mut I,
    f: &mut F,
    order: &O2,
    slot: &mut Slot<U>,
    last: Option<&U>,
) where
    I: SortedIterator,
    F: FnMut(I::Item) -> U,
    O2: Order<U>,
{
    if !slot.is_unfetched() {
        return;
    }

    *slot = match inner.next() {
        Some(item) => {
            let mapped = f(item);
            check_next(ErrorOrigin::Mapped, order, last, &mapped);
            Slot::Buffered(mapped)
        }
        None => Slot::Done,
    };
}

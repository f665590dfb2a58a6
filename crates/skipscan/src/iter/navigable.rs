//! Module: iter::navigable
//! Responsibility: forwardable leaf iterator over a borrowed navigable container.
//! Does not own: the container; it only borrows read access for its lifetime.
//! Boundary: skip-ahead is delegated to `Order::iterate_from` on the container.

use crate::{
    error::ErrorOrigin,
    iter::{Forwardable, SortedIterator, record_forward, slot::Lookahead},
    order::Order,
    source::Navigable,
};

///
/// NavigableIterator
///
/// Leaf forwardable. `forward` is a no-op while the buffered head already
/// satisfies the target; otherwise the cursor is re-derived from the
/// container at the target and the buffered head is discarded.
///

pub struct NavigableIterator<'a, T, O, S>
where
    O: Order<T>,
    S: Navigable<T, O> + ?Sized + 'a,
{
    source: &'a S,
    order: O,
    inner: Lookahead<S::Cursor<'a>, T>,
}

/// Open a forwardable iterator over `source` in `order`.
#[must_use]
pub fn iterate_navigable<'a, T, O, S>(order: O, source: &'a S) -> NavigableIterator<'a, T, O, S>
where
    T: Clone,
    O: Order<T>,
    S: Navigable<T, O> + ?Sized,
{
    let cursor = order.iterate(source);

    NavigableIterator {
        source,
        order,
        inner: Lookahead::new(cursor, ErrorOrigin::Navigable),
    }
}

impl<'a, T, O, S> SortedIterator for NavigableIterator<'a, T, O, S>
where
    T: Clone,
    O: Order<T>,
    S: Navigable<T, O> + ?Sized + 'a,
{
    type Item = T;
    type Order = O;

    fn order(&self) -> &O {
        &self.order
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Navigable
    }

    fn has_next(&mut self) -> bool {
        self.inner.fill(&self.order);
        self.inner.peek().is_some()
    }

    fn peek(&mut self) -> Option<&T> {
        self.inner.fill(&self.order);
        self.inner.peek()
    }

    fn next(&mut self) -> Option<T> {
        self.inner.take(&self.order)
    }

    fn recycle(&mut self) {
        self.inner.release();
    }
}

impl<'a, T, O, S> Forwardable for NavigableIterator<'a, T, O, S>
where
    T: Clone,
    O: Order<T>,
    S: Navigable<T, O> + ?Sized + 'a,
{
    fn last(&self) -> Option<&T> {
        self.inner.last()
    }

    fn forward_unchecked(&mut self, target: &T) {
        if self.inner.is_done() {
            record_forward(ErrorOrigin::Navigable, false);
            return;
        }

        // Already past the target: a re-seek would replay the current tie group.
        let satisfied = self
            .inner
            .peek()
            .is_some_and(|head| self.order.in_order(target, head))
            || self
                .inner
                .last()
                .is_some_and(|last| !self.order.precedes(last, target));
        if satisfied {
            record_forward(ErrorOrigin::Navigable, false);
            return;
        }

        log::trace!("navigable iterator re-seeking under {} order", self.order.label());
        self.inner
            .reposition(self.order.iterate_from(self.source, target));
        record_forward(ErrorOrigin::Navigable, true);
    }
}

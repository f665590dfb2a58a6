//! Module: iter::limited
//! Responsibility: cap the number of produced elements.
//! Does not own: resource release beyond triggering upstream `recycle`.
//! Boundary: the upstream is recycled the instant the last permitted element is produced.

use crate::{
    error::ErrorOrigin,
    iter::{Forwardable, SortedIterator, record_forward},
};

///
/// Limited
///
/// Yields at most `limit` elements. Release is eager: the upstream is
/// recycled inside the `next` call that produces the final element, and a
/// zero limit recycles on first access.
///

pub struct Limited<I> {
    inner: I,
    remaining: usize,
    released: bool,
}

impl<I: SortedIterator> Limited<I> {
    pub(crate) const fn new(inner: I, limit: usize) -> Self {
        Self {
            inner,
            remaining: limit,
            released: false,
        }
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    // Returns true while the limit still admits elements.
    fn admit(&mut self) -> bool {
        if self.remaining > 0 {
            return true;
        }
        self.release();

        false
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.inner.recycle();
        }
    }
}

impl<I: SortedIterator> SortedIterator for Limited<I> {
    type Item = I::Item;
    type Order = I::Order;

    fn order(&self) -> &I::Order {
        self.inner.order()
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Limited
    }

    fn has_next(&mut self) -> bool {
        self.admit() && self.inner.has_next()
    }

    fn peek(&mut self) -> Option<&I::Item> {
        if self.admit() {
            self.inner.peek()
        } else {
            None
        }
    }

    fn next(&mut self) -> Option<I::Item> {
        if !self.admit() {
            return None;
        }
        let item = self.inner.next()?;
        self.remaining -= 1;
        if self.remaining == 0 {
            log::trace!("limit reached, releasing upstream");
            self.release();
        }

        Some(item)
    }

    fn recycle(&mut self) {
        self.release();
    }
}

impl<I: Forwardable> Forwardable for Limited<I> {
    fn last(&self) -> Option<&I::Item> {
        self.inner.last()
    }

    // Skipped elements do not count against the limit.
    fn forward_unchecked(&mut self, target: &I::Item) {
        if self.released {
            record_forward(ErrorOrigin::Limited, false);
            return;
        }

        self.inner.forward_unchecked(target);
    }
}

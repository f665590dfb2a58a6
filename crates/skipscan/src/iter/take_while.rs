//! Module: iter::take_while
//! Responsibility: prefix truncation on the first element failing a condition.
//! Does not own: the failing element, which is consumed and never surfaced.
//! Boundary: the upstream is recycled as soon as the condition fails.

use crate::{
    error::ErrorOrigin,
    iter::{Forwardable, SortedIterator, record_forward},
};

///
/// TakeWhile
///

pub struct TakeWhile<I, P> {
    inner: I,
    condition: P,
    stopped: bool,
}

impl<I, P> TakeWhile<I, P>
where
    I: SortedIterator,
    P: FnMut(&I::Item) -> bool,
{
    pub(crate) const fn new(inner: I, condition: P) -> Self {
        Self {
            inner,
            condition,
            stopped: false,
        }
    }

    fn check_head(&mut self) -> bool {
        if self.stopped {
            return false;
        }

        let accepted = match self.inner.peek() {
            Some(head) => (self.condition)(head),
            None => return false,
        };
        if !accepted {
            self.stop();
        }

        accepted
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.inner.recycle();
    }
}

impl<I, P> SortedIterator for TakeWhile<I, P>
where
    I: SortedIterator,
    P: FnMut(&I::Item) -> bool,
{
    type Item = I::Item;
    type Order = I::Order;

    fn order(&self) -> &I::Order {
        self.inner.order()
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::TakeWhile
    }

    fn has_next(&mut self) -> bool {
        self.check_head()
    }

    fn peek(&mut self) -> Option<&I::Item> {
        if self.check_head() {
            self.inner.peek()
        } else {
            None
        }
    }

    fn next(&mut self) -> Option<I::Item> {
        if self.check_head() {
            self.inner.next()
        } else {
            None
        }
    }

    fn recycle(&mut self) {
        if !self.stopped {
            self.stop();
        }
    }
}

impl<I, P> Forwardable for TakeWhile<I, P>
where
    I: Forwardable,
    P: FnMut(&I::Item) -> bool,
{
    fn last(&self) -> Option<&I::Item> {
        self.inner.last()
    }

    fn forward_unchecked(&mut self, target: &I::Item) {
        if self.stopped {
            record_forward(ErrorOrigin::TakeWhile, false);
            return;
        }

        self.inner.forward_unchecked(target);
    }
}

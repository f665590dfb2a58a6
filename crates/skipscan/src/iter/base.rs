//! Module: iter::base
//! Responsibility: leaf iterators over externally ordered sequences, plus the empty iterator.
//! Does not own: seeking over containers (see `iter::navigable`).
//! Boundary: the entry point for pre-sorted data that has no navigable backing.

use crate::{
    error::ErrorOrigin,
    iter::{Forwardable, SortedIterator, record_forward, slot::Lookahead},
    order::Order,
};
use std::marker::PhantomData;

///
/// BaseIterator
///
/// Adapts a pre-sorted sequence into the sorted contract with single-slot
/// look-ahead. Sortedness of the input is asserted as elements are fetched
/// (see `config::OrderChecks`). Not forwardable: the input cannot seek.
///

pub struct BaseIterator<I: Iterator, O> {
    order: O,
    inner: Lookahead<I, I::Item>,
}

/// Wrap an already sorted sequence.
#[must_use]
pub fn iterate_sorted<T, O, I>(order: O, items: I) -> BaseIterator<I::IntoIter, O>
where
    I: IntoIterator<Item = T>,
    O: Order<T>,
    T: Clone,
{
    BaseIterator {
        order,
        inner: Lookahead::new(items.into_iter(), ErrorOrigin::Base),
    }
}

impl<I, O> SortedIterator for BaseIterator<I, O>
where
    I: Iterator,
    I::Item: Clone,
    O: Order<I::Item>,
{
    type Item = I::Item;
    type Order = O;

    fn order(&self) -> &O {
        &self.order
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Base
    }

    fn has_next(&mut self) -> bool {
        self.inner.fill(&self.order);
        self.inner.peek().is_some()
    }

    fn peek(&mut self) -> Option<&I::Item> {
        self.inner.fill(&self.order);
        self.inner.peek()
    }

    fn next(&mut self) -> Option<I::Item> {
        self.inner.take(&self.order)
    }

    fn recycle(&mut self) {
        self.inner.release();
    }
}

///
/// Empty
///
/// Forwardable iterator with no elements.
///

pub struct Empty<T, O> {
    order: O,
    _marker: PhantomData<fn() -> T>,
}

#[must_use]
pub const fn empty<T, O: Order<T>>(order: O) -> Empty<T, O> {
    Empty {
        order,
        _marker: PhantomData,
    }
}

impl<T, O: Order<T>> SortedIterator for Empty<T, O> {
    type Item = T;
    type Order = O;

    fn order(&self) -> &O {
        &self.order
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Base
    }

    fn has_next(&mut self) -> bool {
        false
    }

    fn peek(&mut self) -> Option<&T> {
        None
    }

    fn next(&mut self) -> Option<T> {
        None
    }

    fn recycle(&mut self) {}
}

impl<T, O: Order<T>> Forwardable for Empty<T, O> {
    fn last(&self) -> Option<&T> {
        None
    }

    fn forward_unchecked(&mut self, _target: &T) {
        record_forward(ErrorOrigin::Base, false);
    }
}

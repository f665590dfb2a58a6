//! Module: iter
//! Responsibility: sorted/forwardable iterator contracts and their composition surface.
//! Does not own: container navigation (see `source`) or order definitions (see `order`).
//! Boundary: query executors build iterator trees through these traits only.

mod adapter;
mod base;
mod distinct;
mod filtered;
mod intersected;
mod lifecycle;
mod limited;
mod mapped;
mod merged;
mod navigable;
mod slot;
mod take_while;

#[cfg(test)]
mod tests;

pub use adapter::StdIter;
pub use base::{BaseIterator, Empty, empty, iterate_sorted};
pub use distinct::Distinct;
pub use filtered::Filtered;
pub use intersected::{Intersected, intersect};
pub use lifecycle::{OnConsumed, OnFinalise};
pub use limited::Limited;
pub use mapped::{Mapped, MappedForwardable};
pub use merged::{Merged, merge};
pub use navigable::{NavigableIterator, iterate_navigable};
pub use take_while::TakeWhile;

use crate::{
    error::{ErrorOrigin, SortedError},
    obs::{self, IteratorEvent},
    order::Order,
};
use std::hash::Hash;

/// Boxed forwardable iterator, for composing heterogeneous inputs.
pub type BoxedForwardable<'a, T, O> = Box<dyn Forwardable<Item = T, Order = O> + 'a>;

/// Boxed sorted iterator.
pub type BoxedSorted<'a, T, O> = Box<dyn SortedIterator<Item = T, Order = O> + 'a>;

///
/// SortedIterator
///
/// Pull-based, lazily produced sequence whose successive elements always
/// satisfy `order().in_order(previous, next)`.
///
/// `has_next` and `peek` fetch at most one element ahead and are idempotent.
/// `next` past the end returns `None`; `try_next` reports it as a
/// no-such-element failure instead. `recycle` releases every resource held
/// by this iterator and its upstream chain, and is always safe to repeat.
///

pub trait SortedIterator {
    type Item;
    type Order: Order<Self::Item>;

    fn order(&self) -> &Self::Order;

    /// Combinator kind, used to tag failures and events.
    fn origin(&self) -> ErrorOrigin;

    fn has_next(&mut self) -> bool;

    fn peek(&mut self) -> Option<&Self::Item>;

    fn next(&mut self) -> Option<Self::Item>;

    fn recycle(&mut self);

    fn try_next(&mut self) -> Result<Self::Item, SortedError> {
        match self.next() {
            Some(item) => Ok(item),
            None => Err(SortedError::no_such_element(self.origin())),
        }
    }

    /// Project values into a new order. `f` must be monotone from
    /// `self.order()` into `order`; this is only checked by assertion.
    fn map<U, F, O2>(self, f: F, order: O2) -> Mapped<Self, U, F, O2>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> U,
        O2: Order<U>,
        U: Clone,
    {
        Mapped::new(self, f, order)
    }

    fn filter<P>(self, predicate: P) -> Filtered<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> bool,
    {
        Filtered::new(self, predicate)
    }

    /// Yield at most `n` elements, recycling the upstream as soon as the
    /// `n`-th element has been produced.
    fn limit(self, n: usize) -> Limited<Self>
    where
        Self: Sized,
    {
        Limited::new(self, n)
    }

    fn distinct(self) -> Distinct<Self>
    where
        Self: Sized,
        Self::Item: Eq + Hash + Clone,
    {
        Distinct::new(self)
    }

    fn take_while<P>(self, condition: P) -> TakeWhile<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> bool,
    {
        TakeWhile::new(self, condition)
    }

    /// Run `f` exactly once, when exhaustion is first observed or on `recycle`.
    fn on_consumed<F>(self, f: F) -> OnConsumed<Self, F>
    where
        Self: Sized,
        F: FnOnce(),
    {
        OnConsumed::new(self, f)
    }

    /// Run `f` exactly once, on `recycle` or when the iterator is dropped.
    fn on_finalise<F>(self, f: F) -> OnFinalise<Self, F>
    where
        Self: Sized,
        F: FnOnce(),
    {
        OnFinalise::new(self, f)
    }

    /// K-way sorted union with `others`, preserving duplicates.
    fn merge<I>(self, others: I) -> Merged<Self, std::vec::IntoIter<Self>>
    where
        Self: Sized,
        Self::Item: Clone,
        I: IntoIterator<Item = Self>,
    {
        let order = self.order().clone();
        let mut inputs = vec![self];
        inputs.extend(others);

        merge(order, inputs)
    }

    fn first(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        let first = self.next();
        self.recycle();

        first
    }

    fn to_vec(mut self) -> Vec<Self::Item>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        while let Some(item) = self.next() {
            out.push(item);
        }
        self.recycle();

        out
    }

    fn count_remaining(mut self) -> usize
    where
        Self: Sized,
    {
        let mut count = 0;
        while self.next().is_some() {
            count += 1;
        }
        self.recycle();

        count
    }

    fn for_each_remaining(mut self, mut f: impl FnMut(Self::Item))
    where
        Self: Sized,
    {
        while let Some(item) = self.next() {
            f(item);
        }
        self.recycle();
    }

    /// Adapt into a `std::iter::Iterator`.
    fn into_std_iter(self) -> StdIter<Self>
    where
        Self: Sized,
    {
        StdIter::new(self)
    }
}

///
/// Forwardable
///
/// Sorted iterator that can skip ahead to the first element not preceding
/// a target, without yielding the elements in between.
///

pub trait Forwardable: SortedIterator {
    /// Last element returned by `next`, the monotonicity witness.
    fn last(&self) -> Option<&Self::Item>;

    /// Position at the first element not preceding `target`.
    /// Callers guarantee `target` does not precede `last()`.
    fn forward_unchecked(&mut self, target: &Self::Item);

    /// Position at the first element not preceding `target`, failing with
    /// an illegal-argument error when `target` precedes `last()`.
    fn forward(&mut self, target: &Self::Item) -> Result<(), SortedError> {
        if let Some(last) = self.last()
            && self.order().precedes(target, last)
        {
            return Err(SortedError::monotonicity_violation(
                self.origin(),
                self.order().label(),
            ));
        }
        self.forward_unchecked(target);

        Ok(())
    }

    /// Project into a new order, keeping seek capability through `reverse`,
    /// which maps a target in the new order back into this iterator's space.
    fn map_sorted<U, F, R, O2>(
        self,
        f: F,
        reverse: R,
        order: O2,
    ) -> MappedForwardable<Self, U, F, R, O2>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> U,
        R: FnMut(&U) -> Self::Item,
        O2: Order<U>,
        U: Clone,
    {
        MappedForwardable::new(self, f, reverse, order)
    }

    /// K-way sorted intersection with `others` via mutual skip-ahead.
    fn intersect<I>(self, others: I) -> Intersected<Self>
    where
        Self: Sized,
        Self::Item: Eq + Hash + Clone,
        I: IntoIterator<Item = Self>,
    {
        let order = self.order().clone();
        let mut inputs = vec![self];
        inputs.extend(others);

        intersect(order, inputs)
    }

    /// Single-shot point lookup: seek to `value` and return it if present.
    /// The iterator is recycled afterwards in every case.
    fn find_first(mut self, value: &Self::Item) -> Result<Option<Self::Item>, SortedError>
    where
        Self: Sized,
        Self::Item: PartialEq,
    {
        let order = self.order().clone();
        let found = match self.forward(value) {
            // The seek lands on the start of the comparator-tied run; scan it.
            Ok(()) => loop {
                let (matched, tied) = match self.peek() {
                    Some(head) => (head == value, order.compare(head, value).is_eq()),
                    None => break None,
                };
                if matched {
                    break self.next();
                }
                if !tied {
                    break None;
                }
                self.next();
            },
            Err(err) => {
                self.recycle();
                return Err(err);
            }
        };
        self.recycle();

        Ok(found)
    }

    fn boxed<'a>(self) -> BoxedForwardable<'a, Self::Item, Self::Order>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

impl<I> SortedIterator for Box<I>
where
    I: SortedIterator + ?Sized,
{
    type Item = I::Item;
    type Order = I::Order;

    fn order(&self) -> &Self::Order {
        self.as_ref().order()
    }

    fn origin(&self) -> ErrorOrigin {
        self.as_ref().origin()
    }

    fn has_next(&mut self) -> bool {
        self.as_mut().has_next()
    }

    fn peek(&mut self) -> Option<&Self::Item> {
        self.as_mut().peek()
    }

    fn next(&mut self) -> Option<Self::Item> {
        self.as_mut().next()
    }

    fn recycle(&mut self) {
        self.as_mut().recycle();
    }
}

impl<I> Forwardable for Box<I>
where
    I: Forwardable + ?Sized,
{
    fn last(&self) -> Option<&Self::Item> {
        self.as_ref().last()
    }

    fn forward_unchecked(&mut self, target: &Self::Item) {
        self.as_mut().forward_unchecked(target);
    }
}

impl<I> SortedIterator for &mut I
where
    I: SortedIterator + ?Sized,
{
    type Item = I::Item;
    type Order = I::Order;

    fn order(&self) -> &Self::Order {
        (**self).order()
    }

    fn origin(&self) -> ErrorOrigin {
        (**self).origin()
    }

    fn has_next(&mut self) -> bool {
        (**self).has_next()
    }

    fn peek(&mut self) -> Option<&Self::Item> {
        (**self).peek()
    }

    fn next(&mut self) -> Option<Self::Item> {
        (**self).next()
    }

    fn recycle(&mut self) {
        (**self).recycle();
    }
}

impl<I> Forwardable for &mut I
where
    I: Forwardable + ?Sized,
{
    fn last(&self) -> Option<&Self::Item> {
        (**self).last()
    }

    fn forward_unchecked(&mut self, target: &Self::Item) {
        (**self).forward_unchecked(target);
    }
}

// Record whether a forward re-positioned its upstream.
pub(crate) fn record_forward(origin: ErrorOrigin, moved: bool) {
    let event = if moved {
        IteratorEvent::Forwarded { origin }
    } else {
        IteratorEvent::ForwardSkipped { origin }
    };

    obs::record(event);
}

// Assert the produced sequence stays ordered when order checks are enabled.
pub(crate) fn check_next<T, O: Order<T>>(
    origin: ErrorOrigin,
    order: &O,
    last: Option<&T>,
    next: &T,
) {
    if crate::config::order_checks_enabled() {
        assert!(
            order.is_valid_next(last, next),
            "{origin} iterator produced an element out of {} order",
            order.label(),
        );
    }
}

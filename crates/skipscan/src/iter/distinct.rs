//! Module: iter::distinct
//! Responsibility: duplicate suppression over sorted input.
//! Does not own: global deduplication; only the current tie group is remembered.
//! Boundary: state is bounded by the largest comparator-equal run.

use crate::{
    error::ErrorOrigin,
    iter::{Forwardable, SortedIterator},
    obs::{self, IteratorEvent},
    order::Order,
};
use std::{cmp::Ordering, collections::HashSet, hash::Hash};

///
/// Distinct
///
/// Emits each value once. Comparator-equal values that are not equal as
/// values are all kept; the working set is cleared whenever the comparator
/// value advances past the last emitted element.
///

pub struct Distinct<I: SortedIterator> {
    inner: I,
    order: I::Order,
    ties: HashSet<I::Item>,
    last: Option<I::Item>,
}

impl<I> Distinct<I>
where
    I: SortedIterator,
    I::Item: Eq + Hash + Clone,
{
    pub(crate) fn new(inner: I) -> Self {
        let order = inner.order().clone();

        Self {
            inner,
            order,
            ties: HashSet::new(),
            last: None,
        }
    }

    // Advance past heads already emitted within the current tie group.
    fn skip_seen(&mut self) -> bool {
        loop {
            let Some(head) = self.inner.peek() else {
                return false;
            };
            if self
                .last
                .as_ref()
                .is_some_and(|last| self.order.compare(last, head) != Ordering::Equal)
            {
                self.ties.clear();
            }
            if !self.ties.contains(head) {
                return true;
            }

            self.inner.next();
            obs::record(IteratorEvent::DuplicateSuppressed {
                origin: ErrorOrigin::Distinct,
            });
        }
    }
}

impl<I> SortedIterator for Distinct<I>
where
    I: SortedIterator,
    I::Item: Eq + Hash + Clone,
{
    type Item = I::Item;
    type Order = I::Order;

    fn order(&self) -> &I::Order {
        &self.order
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Distinct
    }

    fn has_next(&mut self) -> bool {
        self.skip_seen()
    }

    fn peek(&mut self) -> Option<&I::Item> {
        if self.skip_seen() {
            self.inner.peek()
        } else {
            None
        }
    }

    fn next(&mut self) -> Option<I::Item> {
        if !self.skip_seen() {
            return None;
        }
        let item = self.inner.next()?;
        self.ties.insert(item.clone());
        self.last = Some(item.clone());

        Some(item)
    }

    fn recycle(&mut self) {
        self.ties.clear();
        self.inner.recycle();
    }
}

impl<I> Forwardable for Distinct<I>
where
    I: Forwardable,
    I::Item: Eq + Hash + Clone,
{
    fn last(&self) -> Option<&I::Item> {
        self.last.as_ref()
    }

    // Suppressed duplicates stay comparator-equal to `last`.
    fn forward_unchecked(&mut self, target: &I::Item) {
        self.inner.forward_unchecked(target);
    }
}

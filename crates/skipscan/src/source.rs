//! Module: source
//! Responsibility: the navigable-container capability supplied by storage collaborators.
//! Does not own: iterator state, monotonicity checks, or resource lifecycle.
//! Boundary: `Order::iterate`/`iterate_from` are the only callers inside this crate.

use crate::order::{Asc, Desc, Direction, Order};
use std::{collections::BTreeSet, ops::Bound};

///
/// Navigable
///
/// An ordered container able to open a plain forward cursor over its
/// contents, either from the start or from the first element not preceding
/// a target under order `O`. The cursor borrows the container; it never
/// owns it.
///

pub trait Navigable<T, O: Order<T>> {
    type Cursor<'a>: Iterator<Item = T>
    where
        Self: 'a;

    fn cursor(&self, order: &O, from: Option<&T>) -> Self::Cursor<'_>;
}

///
/// BTreeSetCursor
///
/// Cursor over a `BTreeSet` range. Descending traversal walks the range from
/// the back.
///

#[derive(Debug)]
pub struct BTreeSetCursor<'a, T> {
    range: std::collections::btree_set::Range<'a, T>,
    direction: Direction,
}

impl<T: Clone> Iterator for BTreeSetCursor<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = match self.direction {
            Direction::Asc => self.range.next(),
            Direction::Desc => self.range.next_back(),
        };

        item.cloned()
    }
}

fn btree_cursor<'a, T: Ord>(
    set: &'a BTreeSet<T>,
    direction: Direction,
    from: Option<&T>,
) -> BTreeSetCursor<'a, T> {
    let range = match (direction, from) {
        (_, None) => set.range::<T, _>(..),
        (Direction::Asc, Some(target)) => set.range((Bound::Included(target), Bound::Unbounded)),
        (Direction::Desc, Some(target)) => set.range((Bound::Unbounded, Bound::Included(target))),
    };

    BTreeSetCursor { range, direction }
}

impl<T: Ord + Clone> Navigable<T, Asc> for BTreeSet<T> {
    type Cursor<'a>
        = BTreeSetCursor<'a, T>
    where
        Self: 'a;

    fn cursor(&self, _order: &Asc, from: Option<&T>) -> Self::Cursor<'_> {
        btree_cursor(self, Direction::Asc, from)
    }
}

impl<T: Ord + Clone> Navigable<T, Desc> for BTreeSet<T> {
    type Cursor<'a>
        = BTreeSetCursor<'a, T>
    where
        Self: 'a;

    fn cursor(&self, _order: &Desc, from: Option<&T>) -> Self::Cursor<'_> {
        btree_cursor(self, Direction::Desc, from)
    }
}

///
/// SliceCursor
///
/// Cursor over a slice stored ascending under the order's `cmp_keys`.
/// Seeking uses binary search, so any comparator works, including ones
/// with ties.
///

#[derive(Debug)]
pub struct SliceCursor<'a, T> {
    slice: &'a [T],
    front: usize,
    back: usize,
    direction: Direction,
}

impl<T: Clone> Iterator for SliceCursor<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }

        let index = match self.direction {
            Direction::Asc => {
                self.front += 1;
                self.front - 1
            }
            Direction::Desc => {
                self.back -= 1;
                self.back
            }
        };

        Some(self.slice[index].clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T: Clone, O: Order<T>> Navigable<T, O> for [T] {
    type Cursor<'a>
        = SliceCursor<'a, T>
    where
        Self: 'a;

    fn cursor(&self, order: &O, from: Option<&T>) -> Self::Cursor<'_> {
        let direction = order.direction();
        let (front, back) = match (direction, from) {
            (_, None) => (0, self.len()),
            (Direction::Asc, Some(target)) => (
                self.partition_point(|item| order.cmp_keys(item, target).is_lt()),
                self.len(),
            ),
            (Direction::Desc, Some(target)) => (
                0,
                self.partition_point(|item| !order.cmp_keys(item, target).is_gt()),
            ),
        };

        SliceCursor {
            slice: self,
            front,
            back,
            direction,
        }
    }
}

impl<T: Clone, O: Order<T>> Navigable<T, O> for Vec<T> {
    type Cursor<'a>
        = SliceCursor<'a, T>
    where
        Self: 'a;

    fn cursor(&self, order: &O, from: Option<&T>) -> Self::Cursor<'_> {
        self.as_slice().cursor(order, from)
    }
}

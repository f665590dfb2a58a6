//! Module: order
//! Responsibility: total orders with direction, and the orderer capability over navigable sources.
//! Does not own: cursor state or monotonicity tracking (see `iter`).
//! Boundary: every combinator is generic over one `Order` and never branches on direction itself.

use crate::source::Navigable;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

///
/// Direction
///
/// Canonical traversal direction shared by orders and navigable cursors.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Human-readable label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

///
/// Order
///
/// A total order over `T` paired with a traversal direction.
///
/// `cmp_keys` is the underlying ascending comparator; `compare` applies the
/// direction so that `Less` always means "produced first". Comparator ties
/// need not coincide with `Eq`: two values may compare `Equal` while being
/// distinct, which is what `distinct` and `intersect` tie handling rely on.
///

pub trait Order<T>: Clone + fmt::Debug {
    fn direction(&self) -> Direction;

    fn cmp_keys(&self, left: &T, right: &T) -> Ordering;

    fn compare(&self, left: &T, right: &T) -> Ordering {
        match self.direction() {
            Direction::Asc => self.cmp_keys(left, right),
            Direction::Desc => self.cmp_keys(right, left),
        }
    }

    /// `left` may legally precede or equal `right`.
    fn in_order(&self, left: &T, right: &T) -> bool {
        !self.compare(left, right).is_gt()
    }

    /// `left` strictly precedes `right`.
    fn precedes(&self, left: &T, right: &T) -> bool {
        self.compare(left, right).is_lt()
    }

    fn is_valid_next(&self, last: Option<&T>, next: &T) -> bool {
        last.is_none_or(|last| self.in_order(last, next))
    }

    fn label(&self) -> &'static str {
        self.direction().label()
    }

    /// Plain cursor over the whole source in this order.
    fn iterate<'a, S>(&self, source: &'a S) -> S::Cursor<'a>
    where
        Self: Sized,
        S: Navigable<T, Self> + ?Sized,
    {
        source.cursor(self, None)
    }

    /// Cursor positioned at the first element not preceding `target`.
    fn iterate_from<'a, S>(&self, source: &'a S, target: &T) -> S::Cursor<'a>
    where
        Self: Sized,
        S: Navigable<T, Self> + ?Sized,
    {
        source.cursor(self, Some(target))
    }
}

///
/// Asc
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Asc;

impl<T: Ord> Order<T> for Asc {
    fn direction(&self) -> Direction {
        Direction::Asc
    }

    fn cmp_keys(&self, left: &T, right: &T) -> Ordering {
        left.cmp(right)
    }
}

///
/// Desc
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Desc;

impl<T: Ord> Order<T> for Desc {
    fn direction(&self) -> Direction {
        Direction::Desc
    }

    fn cmp_keys(&self, left: &T, right: &T) -> Ordering {
        left.cmp(right)
    }
}

///
/// ByKey
///
/// Orders values by a projected key. Values sharing a key are comparator
/// ties even when they differ as a whole, e.g. index entries sharing a
/// prefix.
///

pub struct ByKey<T, K: ?Sized> {
    direction: Direction,
    key: fn(&T) -> &K,
}

impl<T, K: ?Sized> ByKey<T, K> {
    #[must_use]
    pub const fn new(direction: Direction, key: fn(&T) -> &K) -> Self {
        Self { direction, key }
    }

    #[must_use]
    pub const fn asc(key: fn(&T) -> &K) -> Self {
        Self::new(Direction::Asc, key)
    }

    #[must_use]
    pub const fn desc(key: fn(&T) -> &K) -> Self {
        Self::new(Direction::Desc, key)
    }

    /// Project the ordering key of one value.
    pub fn key_of<'v>(&self, value: &'v T) -> &'v K {
        (self.key)(value)
    }
}

impl<T, K: ?Sized> Clone for ByKey<T, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, K: ?Sized> Copy for ByKey<T, K> {}

impl<T, K: ?Sized> fmt::Debug for ByKey<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByKey")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl<T, K: Ord + ?Sized> Order<T> for ByKey<T, K> {
    fn direction(&self) -> Direction {
        self.direction
    }

    fn cmp_keys(&self, left: &T, right: &T) -> Ordering {
        self.key_of(left).cmp(self.key_of(right))
    }
}

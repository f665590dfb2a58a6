//! Module: iter::adapter
//! Responsibility: bridge from the sorted-iterator contract to `std::iter::Iterator`.
//! Does not own: any ordering or lifecycle policy of its own.
//! Boundary: drains the wrapped iterator and recycles it once exhausted.

use crate::iter::SortedIterator;

///
/// StdIter
///
/// `std::iter::Iterator` view over a sorted iterator, so executors can use
/// the standard adaptor toolbox on already-composed trees.
///

pub struct StdIter<I: SortedIterator> {
    inner: I,
}

impl<I: SortedIterator> StdIter<I> {
    #[must_use]
    pub(crate) const fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Return the wrapped sorted iterator.
    #[must_use]
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: SortedIterator> Iterator for StdIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next();
        if item.is_none() {
            self.inner.recycle();
        }

        item
    }
}

//! Composable sorted iterators for query execution: ordered leaves over
//! navigable containers, skip-ahead forwarding, and the map / filter /
//! distinct / merge / intersect combinators built on top of them.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod iter;
pub mod obs;
pub mod order;
pub mod source;

#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Iterator contracts, orders, and leaf constructors.
/// No configuration, observability, or error types are re-exported here.
///

pub mod prelude {
    pub use crate::{
        iter::{
            Forwardable, SortedIterator, empty, intersect, iterate_navigable, iterate_sorted, merge,
        },
        order::{Asc, ByKey, Desc, Direction, Order},
        source::Navigable,
    };
}

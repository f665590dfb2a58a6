//! Module: iter::slot
//! Responsibility: explicit fetch-state unions shared by leaves and single-upstream combinators.
//! Does not own: positioning policy (forward) or combinator semantics.
//! Boundary: every state transition goes through these helpers; no loose `last`/`next` fields.

use crate::{
    config,
    error::ErrorOrigin,
    obs::{self, IteratorEvent},
    order::Order,
};
use std::mem;

///
/// Slot
///
/// One-element look-ahead for combinators that produce owned values
/// (e.g. a mapped projection) rather than borrowing their upstream head.
///

#[derive(Debug)]
pub(crate) enum Slot<T> {
    Unfetched,
    Buffered(T),
    Done,
}

impl<T> Slot<T> {
    pub(crate) const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub(crate) const fn is_unfetched(&self) -> bool {
        matches!(self, Self::Unfetched)
    }

    pub(crate) const fn buffered(&self) -> Option<&T> {
        match self {
            Self::Buffered(item) => Some(item),
            Self::Unfetched | Self::Done => None,
        }
    }

    /// Take the buffered value, leaving the slot unfetched.
    pub(crate) fn take(&mut self) -> Option<T> {
        match mem::replace(self, Self::Unfetched) {
            Self::Buffered(item) => Some(item),
            Self::Unfetched => None,
            Self::Done => {
                *self = Self::Done;
                None
            }
        }
    }
}

///
/// LeafState
///
/// Cursor-owning fetch state. `Done` means the cursor has been released,
/// either by exhaustion or by `recycle`.
///

enum LeafState<C, T> {
    Unfetched(C),
    Buffered(C, T),
    Done,
}

///
/// Lookahead
///
/// Single-slot buffering over a plain cursor, with the last returned
/// element kept as the monotonicity witness.
///

pub(crate) struct Lookahead<C, T> {
    state: LeafState<C, T>,
    last: Option<T>,
    origin: ErrorOrigin,
}

impl<C, T> Lookahead<C, T>
where
    C: Iterator<Item = T>,
    T: Clone,
{
    pub(crate) const fn new(cursor: C, origin: ErrorOrigin) -> Self {
        Self {
            state: LeafState::Unfetched(cursor),
            last: None,
            origin,
        }
    }

    pub(crate) const fn is_done(&self) -> bool {
        matches!(self.state, LeafState::Done)
    }

    pub(crate) const fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    pub(crate) const fn peek(&self) -> Option<&T> {
        match &self.state {
            LeafState::Buffered(_, item) => Some(item),
            LeafState::Unfetched(_) | LeafState::Done => None,
        }
    }

    // Pull one element from the cursor when nothing is buffered.
    pub(crate) fn fill<O: Order<T>>(&mut self, order: &O) {
        if !matches!(self.state, LeafState::Unfetched(_)) {
            return;
        }
        let LeafState::Unfetched(mut cursor) = mem::replace(&mut self.state, LeafState::Done)
        else {
            return;
        };

        match cursor.next() {
            Some(item) => {
                if config::order_checks_enabled() {
                    assert!(
                        order.is_valid_next(self.last.as_ref(), &item),
                        "{} source produced an element out of {} order",
                        self.origin,
                        order.label(),
                    );
                }
                self.state = LeafState::Buffered(cursor, item);
            }
            None => {
                drop(cursor);
                obs::record(IteratorEvent::Exhausted {
                    origin: self.origin,
                });
            }
        }
    }

    pub(crate) fn take<O: Order<T>>(&mut self, order: &O) -> Option<T> {
        self.fill(order);
        let LeafState::Buffered(cursor, item) = mem::replace(&mut self.state, LeafState::Done)
        else {
            return None;
        };

        self.state = LeafState::Unfetched(cursor);
        self.last = Some(item.clone());

        Some(item)
    }

    /// Swap in a freshly positioned cursor, discarding any buffered element.
    pub(crate) fn reposition(&mut self, cursor: C) {
        if self.is_done() {
            return;
        }

        self.state = LeafState::Unfetched(cursor);
    }

    /// Release the cursor. Idempotent.
    pub(crate) fn release(&mut self) {
        if self.is_done() {
            return;
        }

        self.state = LeafState::Done;
        log::trace!("{} iterator recycled", self.origin);
        obs::record(IteratorEvent::Recycled {
            origin: self.origin,
        });
    }
}

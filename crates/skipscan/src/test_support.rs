//! Probe iterators for observing upstream interaction in tests.

use crate::{
    error::ErrorOrigin,
    iter::{Forwardable, SortedIterator},
    order::Order,
};
use std::{cell::Cell, rc::Rc};

///
/// ProbeLog
///
/// Shared counters a test keeps after the probe is moved into a chain.
///

#[derive(Debug, Default)]
pub(crate) struct ProbeLog {
    recycles: Cell<usize>,
    pulls: Cell<usize>,
    forwards: Cell<usize>,
}

impl ProbeLog {
    /// Effective releases; repeated `recycle` calls count once.
    pub(crate) fn recycles(&self) -> usize {
        self.recycles.get()
    }

    pub(crate) fn pulls(&self) -> usize {
        self.pulls.get()
    }

    pub(crate) fn forwards(&self) -> usize {
        self.forwards.get()
    }

    pub(crate) fn released(&self) -> bool {
        self.recycles() > 0
    }
}

///
/// Probe
///
/// Forwardable in-memory iterator that reports pulls, forwards, and releases.
///

pub(crate) struct Probe<T, O> {
    items: Vec<T>,
    position: usize,
    order: O,
    last: Option<T>,
    released: bool,
    log: Rc<ProbeLog>,
}

pub(crate) fn probe<T, O>(order: O, items: Vec<T>) -> (Probe<T, O>, Rc<ProbeLog>)
where
    T: Clone,
    O: Order<T>,
{
    let log = Rc::new(ProbeLog::default());
    let probe = Probe {
        items,
        position: 0,
        order,
        last: None,
        released: false,
        log: Rc::clone(&log),
    };

    (probe, log)
}

impl<T: Clone, O: Order<T>> SortedIterator for Probe<T, O> {
    type Item = T;
    type Order = O;

    fn order(&self) -> &O {
        &self.order
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Base
    }

    fn has_next(&mut self) -> bool {
        !self.released && self.position < self.items.len()
    }

    fn peek(&mut self) -> Option<&T> {
        if self.released {
            return None;
        }

        self.items.get(self.position)
    }

    fn next(&mut self) -> Option<T> {
        if self.released {
            return None;
        }
        let item = self.items.get(self.position).cloned()?;
        self.position += 1;
        self.log.pulls.set(self.log.pulls.get() + 1);
        self.last = Some(item.clone());

        Some(item)
    }

    fn recycle(&mut self) {
        if !self.released {
            self.released = true;
            self.log.recycles.set(self.log.recycles.get() + 1);
        }
    }
}

impl<T: Clone, O: Order<T>> Forwardable for Probe<T, O> {
    fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    fn forward_unchecked(&mut self, target: &T) {
        self.log.forwards.set(self.log.forwards.get() + 1);
        while self
            .items
            .get(self.position)
            .is_some_and(|item| self.order.precedes(item, target))
        {
            self.position += 1;
        }
    }
}

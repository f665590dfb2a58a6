//! Module: iter::merged
//! Responsibility: lazy k-way sorted union over same-order inputs.
//! Does not own: deduplication; duplicates across inputs are preserved.
//! Boundary: inputs popped from the heap wait in a pending list until the next fetch.

use crate::{
    error::ErrorOrigin,
    iter::{Forwardable, SortedIterator, check_next, record_forward},
    obs::{self, IteratorEvent},
    order::Order,
};
use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

///
/// HeapEntry
///
/// Buffered head of one input, keyed for the merge heap. Ties break on
/// input position so equal heads drain in input order.
///

struct HeapEntry<T, O> {
    head: T,
    source: usize,
    order: O,
}

impl<T, O: Order<T>> PartialEq for HeapEntry<T, O> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, O: Order<T>> Eq for HeapEntry<T, O> {}

impl<T, O: Order<T>> PartialOrd for HeapEntry<T, O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, O: Order<T>> Ord for HeapEntry<T, O> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order
            .compare(&self.head, &other.head)
            .then_with(|| self.source.cmp(&other.source))
    }
}

///
/// Frontier
///
/// Active merge state. Every live input is either in `heap` (head
/// buffered) or in `pending` (popped or forwarded, not yet re-polled).
///

struct Frontier<I: SortedIterator> {
    inputs: Vec<I>,
    heap: BinaryHeap<Reverse<HeapEntry<I::Item, I::Order>>>,
    pending: Vec<usize>,
}

impl<I> Frontier<I>
where
    I: SortedIterator,
    I::Item: Clone,
{
    fn new(inputs: Vec<I>) -> Self {
        let pending = (0..inputs.len()).collect();

        Self {
            heap: BinaryHeap::with_capacity(inputs.len()),
            inputs,
            pending,
        }
    }

    // Re-poll every pending input; exhausted ones simply drop out.
    fn refill(&mut self, order: &I::Order) {
        for source in self.pending.drain(..) {
            if let Some(head) = self.inputs[source].peek() {
                self.heap.push(Reverse(HeapEntry {
                    head: head.clone(),
                    source,
                    order: order.clone(),
                }));
            }
        }
    }

    fn head(&self) -> Option<&I::Item> {
        self.heap.peek().map(|Reverse(entry)| &entry.head)
    }

    fn pop(&mut self) -> Option<I::Item> {
        let Reverse(entry) = self.heap.pop()?;
        let advanced = self.inputs[entry.source].next();
        self.pending.push(entry.source);

        Some(advanced.unwrap_or(entry.head))
    }

    fn recycle_all(&mut self) {
        self.heap.clear();
        self.pending.clear();
        for input in &mut self.inputs {
            input.recycle();
        }
    }
}

impl<I> Frontier<I>
where
    I: Forwardable,
    I::Item: Clone,
{
    // Forward pending inputs, then pull back every heaped input whose head
    // still precedes the target. Returns whether any input was moved.
    fn forward(&mut self, order: &I::Order, target: &I::Item) -> bool {
        let mut moved = !self.pending.is_empty();
        for &source in &self.pending {
            self.inputs[source].forward_unchecked(target);
        }

        while let Some(Reverse(entry)) = self.heap.peek() {
            if !order.precedes(&entry.head, target) {
                break;
            }
            let source = entry.source;
            self.heap.pop();
            self.inputs[source].forward_unchecked(target);
            self.pending.push(source);
            moved = true;
        }

        moved
    }
}

///
/// MergeState
///

enum MergeState<I: SortedIterator, S> {
    Init(S),
    Active(Frontier<I>),
    Done,
}

///
/// Merged
///
/// Sorted multiset union. The input producer is drained on first access,
/// so building a merge never touches its inputs.
///

pub struct Merged<I: SortedIterator, S> {
    order: I::Order,
    state: MergeState<I, S>,
    last: Option<I::Item>,
}

/// Merge `inputs`, all sorted by `order`, into one sorted stream.
#[must_use]
pub fn merge<I, S>(order: I::Order, inputs: S) -> Merged<I, S::IntoIter>
where
    I: SortedIterator,
    I::Item: Clone,
    S: IntoIterator<Item = I>,
{
    Merged {
        order,
        state: MergeState::Init(inputs.into_iter()),
        last: None,
    }
}

impl<I, S> Merged<I, S>
where
    I: SortedIterator,
    I::Item: Clone,
    S: Iterator<Item = I>,
{
    fn activate(&mut self) {
        if let MergeState::Init(producer) = &mut self.state {
            let inputs: Vec<I> = producer.collect();
            log::trace!("merge activated over {} inputs", inputs.len());
            self.state = MergeState::Active(Frontier::new(inputs));
        }
    }

    // Bring the heap up to date; completes the merge once nothing remains.
    fn fill(&mut self) -> Option<&mut Frontier<I>> {
        self.activate();
        let MergeState::Active(frontier) = &mut self.state else {
            return None;
        };

        frontier.refill(&self.order);
        if frontier.heap.is_empty() {
            frontier.recycle_all();
            self.state = MergeState::Done;
            obs::record(IteratorEvent::Exhausted {
                origin: ErrorOrigin::Merged,
            });
            return None;
        }

        match &mut self.state {
            MergeState::Active(frontier) => Some(frontier),
            MergeState::Init(_) | MergeState::Done => None,
        }
    }
}

impl<I, S> SortedIterator for Merged<I, S>
where
    I: SortedIterator,
    I::Item: Clone,
    S: Iterator<Item = I>,
{
    type Item = I::Item;
    type Order = I::Order;

    fn order(&self) -> &I::Order {
        &self.order
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Merged
    }

    fn has_next(&mut self) -> bool {
        self.fill().is_some()
    }

    fn peek(&mut self) -> Option<&I::Item> {
        self.fill().and_then(|frontier| frontier.head())
    }

    fn next(&mut self) -> Option<I::Item> {
        let item = self.fill()?.pop()?;
        check_next(ErrorOrigin::Merged, &self.order, self.last.as_ref(), &item);
        self.last = Some(item.clone());

        Some(item)
    }

    fn recycle(&mut self) {
        match std::mem::replace(&mut self.state, MergeState::Done) {
            MergeState::Init(producer) => {
                for mut input in producer {
                    input.recycle();
                }
            }
            MergeState::Active(mut frontier) => frontier.recycle_all(),
            MergeState::Done => return,
        }

        log::trace!("merge recycled");
        obs::record(IteratorEvent::Recycled {
            origin: ErrorOrigin::Merged,
        });
    }
}

impl<I, S> Forwardable for Merged<I, S>
where
    I: Forwardable,
    I::Item: Clone,
    S: Iterator<Item = I>,
{
    fn last(&self) -> Option<&I::Item> {
        self.last.as_ref()
    }

    fn forward_unchecked(&mut self, target: &I::Item) {
        self.activate();
        let moved = match &mut self.state {
            MergeState::Active(frontier) => frontier.forward(&self.order, target),
            MergeState::Init(_) | MergeState::Done => false,
        };

        record_forward(ErrorOrigin::Merged, moved);
    }
}

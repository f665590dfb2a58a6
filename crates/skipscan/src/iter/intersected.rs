//! Module: iter::intersected
//! Responsibility: lazy k-way sorted intersection by mutual skip-ahead.
//! Does not own: input positioning semantics beyond `forward_unchecked` calls.
//! Boundary: each agreed tie group is drained from every input before emission.

use crate::{
    config,
    error::ErrorOrigin,
    iter::{Forwardable, SortedIterator, check_next, record_forward},
    obs::{self, IteratorEvent},
    order::Order,
};
use std::{
    cmp::Ordering,
    collections::{HashMap, VecDeque},
    hash::Hash,
};

///
/// IntersectState
///

enum IntersectState<T> {
    Seeking,
    Group(VecDeque<T>),
    Done,
}

///
/// Intersected
///
/// Emits values present, by comparator equality, in every input.
///
/// Agreement is found by candidate proposal: the first input's head is the
/// candidate, every other input is forwarded to it in turn, and any head
/// found strictly past the candidate becomes the new candidate. One full
/// round of agreement costs `k` forwards, and candidates only move forward,
/// so the search stays bounded by the shortest input.
///
/// Once all inputs agree, each input's comparator-tied run is drained and
/// the runs are combined as a multiset union: every distinct value is
/// emitted as many times as the input holding the most copies of it.
///

pub struct Intersected<I: SortedIterator> {
    order: I::Order,
    inputs: Vec<I>,
    state: IntersectState<I::Item>,
    last: Option<I::Item>,
}

/// Intersect `inputs`, all sorted by `order`. No inputs yield nothing.
#[must_use]
pub fn intersect<I, S>(order: I::Order, inputs: S) -> Intersected<I>
where
    I: Forwardable,
    I::Item: Eq + Hash + Clone,
    S: IntoIterator<Item = I>,
{
    let inputs: Vec<I> = inputs.into_iter().collect();
    let state = if inputs.is_empty() {
        IntersectState::Done
    } else {
        IntersectState::Seeking
    };

    Intersected {
        order,
        inputs,
        state,
        last: None,
    }
}

impl<I> Intersected<I>
where
    I: Forwardable,
    I::Item: Eq + Hash + Clone,
{
    // Advance until a tie group is buffered or the intersection is complete.
    fn fill(&mut self) {
        loop {
            match &self.state {
                IntersectState::Group(group) if !group.is_empty() => return,
                IntersectState::Done => return,
                IntersectState::Group(_) | IntersectState::Seeking => {}
            }

            match propose_candidates(&self.order, &mut self.inputs) {
                Some(candidate) => {
                    let group = drain_tie_group(&self.order, &mut self.inputs, &candidate);
                    self.state = IntersectState::Group(group);
                }
                None => {
                    self.finish();
                    obs::record(IteratorEvent::Exhausted {
                        origin: ErrorOrigin::Intersected,
                    });
                }
            }
        }
    }

    fn front(&self) -> Option<&I::Item> {
        match &self.state {
            IntersectState::Group(group) => group.front(),
            IntersectState::Seeking | IntersectState::Done => None,
        }
    }

    fn finish(&mut self) {
        self.state = IntersectState::Done;
        for input in &mut self.inputs {
            input.recycle();
        }
    }
}

impl<I> SortedIterator for Intersected<I>
where
    I: Forwardable,
    I::Item: Eq + Hash + Clone,
{
    type Item = I::Item;
    type Order = I::Order;

    fn order(&self) -> &I::Order {
        &self.order
    }

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Intersected
    }

    fn has_next(&mut self) -> bool {
        self.fill();
        self.front().is_some()
    }

    fn peek(&mut self) -> Option<&I::Item> {
        self.fill();
        self.front()
    }

    fn next(&mut self) -> Option<I::Item> {
        self.fill();
        let IntersectState::Group(group) = &mut self.state else {
            return None;
        };
        let item = group.pop_front()?;
        check_next(
            ErrorOrigin::Intersected,
            &self.order,
            self.last.as_ref(),
            &item,
        );
        self.last = Some(item.clone());

        Some(item)
    }

    fn recycle(&mut self) {
        if matches!(self.state, IntersectState::Done) {
            return;
        }

        self.finish();
        log::trace!("intersection recycled");
        obs::record(IteratorEvent::Recycled {
            origin: ErrorOrigin::Intersected,
        });
    }
}

impl<I> Forwardable for Intersected<I>
where
    I: Forwardable,
    I::Item: Eq + Hash + Clone,
{
    fn last(&self) -> Option<&I::Item> {
        self.last.as_ref()
    }

    fn forward_unchecked(&mut self, target: &I::Item) {
        let satisfied = match &self.state {
            IntersectState::Done => true,
            IntersectState::Group(group) => group
                .front()
                .is_some_and(|head| self.order.in_order(target, head)),
            IntersectState::Seeking => false,
        };
        if satisfied {
            record_forward(ErrorOrigin::Intersected, false);
            return;
        }

        self.state = IntersectState::Seeking;
        for input in &mut self.inputs {
            input.forward_unchecked(target);
        }
        record_forward(ErrorOrigin::Intersected, true);
    }
}

// Run candidate proposal until every input's head agrees with the
// candidate. `None` means some input ran out.
fn propose_candidates<I>(order: &I::Order, inputs: &mut [I]) -> Option<I::Item>
where
    I: Forwardable,
    I::Item: Clone,
{
    let count = inputs.len();
    let mut candidate = inputs.first_mut()?.peek()?.clone();
    obs::record(IteratorEvent::CandidateProposed {
        origin: ErrorOrigin::Intersected,
    });

    let mut agreed = 1;
    let mut index = 1 % count;
    while agreed < count {
        let input = &mut inputs[index];
        input.forward_unchecked(&candidate);
        let head = input.peek()?;

        match order.compare(head, &candidate) {
            Ordering::Equal => agreed += 1,
            Ordering::Greater => {
                candidate = head.clone();
                agreed = 1;
                obs::record(IteratorEvent::CandidateProposed {
                    origin: ErrorOrigin::Intersected,
                });
            }
            Ordering::Less => {
                assert!(
                    !config::order_checks_enabled(),
                    "intersection input stopped short of its forward target under {} order",
                    order.label(),
                );
                input.next();
                continue;
            }
        }
        index = (index + 1) % count;
    }

    Some(candidate)
}

// Drain the comparator-tied run at `candidate` from every input and
// combine the runs as a multiset union, in order of first appearance.
fn drain_tie_group<I>(
    order: &I::Order,
    inputs: &mut [I],
    candidate: &I::Item,
) -> VecDeque<I::Item>
where
    I: Forwardable,
    I::Item: Eq + Hash + Clone,
{
    let mut group = VecDeque::new();
    let mut emitted: HashMap<I::Item, usize> = HashMap::new();

    for input in inputs {
        let mut local: HashMap<I::Item, usize> = HashMap::new();
        while input
            .peek()
            .is_some_and(|head| order.compare(head, candidate) == Ordering::Equal)
        {
            let Some(item) = input.next() else {
                break;
            };
            let seen_here = local.entry(item.clone()).or_insert(0);
            *seen_here += 1;
            let seen_total = emitted.entry(item.clone()).or_insert(0);
            if *seen_here > *seen_total {
                *seen_total += 1;
                group.push_back(item);
            }
        }
    }

    group
}

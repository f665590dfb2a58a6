
use crate::{
    config::{EngineConfig, OrderChecks, with_config},
    error::{ErrorClass, ErrorOrigin},
    iter::{Forwardable, SortedIterator, empty, intersect, iterate_navigable, iterate_sorted, merge},
    obs::{counters_report, counters_reset},
    order::{Asc, ByKey, Desc},
    test_support::{Probe, probe},
};
use std::{cell::Cell, collections::BTreeSet, rc::Rc};

type Row = (u32, char);

fn by_first() -> ByKey<Row, u32> {
    ByKey::asc(|row| &row.0)
}

fn strict_checks() -> EngineConfig {
    EngineConfig {
        order_checks: OrderChecks::Always,
        ..EngineConfig::default()
    }
}

fn counter() -> (Rc<Cell<usize>>, impl FnOnce()) {
    let count = Rc::new(Cell::new(0));
    let handle = Rc::clone(&count);

    (count, move || handle.set(handle.get() + 1))
}

// ------------------------------------------------------------------
// Base and navigable leaves
// ------------------------------------------------------------------

#[test]
fn iterate_sorted_peek_is_idempotent() {
    let mut it = iterate_sorted(Asc, vec![1, 2]);

    assert_eq!(it.peek(), Some(&1));
    assert_eq!(it.peek(), Some(&1));
    assert!(it.has_next());
    assert_eq!(it.next(), Some(1));
    assert_eq!(it.peek(), Some(&2));
}

#[test]
fn try_next_past_end_reports_no_such_element() {
    let mut it = iterate_sorted(Asc, vec![7]);

    assert_eq!(it.try_next().expect("first element should exist"), 7);
    let err = it.try_next().expect_err("exhausted iterator should fail");

    assert_eq!(err.class, ErrorClass::NoSuchElement);
    assert_eq!(err.origin, ErrorOrigin::Base);
}

#[test]
#[should_panic(expected = "out of ASC order")]
fn unsorted_base_input_trips_order_check() {
    with_config(strict_checks(), || {
        iterate_sorted(Asc, vec![1, 3, 2]).to_vec();
    });
}

#[test]
fn unsorted_base_input_passes_when_checks_are_off() {
    let relaxed = EngineConfig {
        order_checks: OrderChecks::Off,
        ..EngineConfig::default()
    };

    let out = with_config(relaxed, || iterate_sorted(Asc, vec![1, 3, 2]).to_vec());

    assert_eq!(out, vec![1, 3, 2]);
}

#[test]
fn empty_iterator_yields_nothing_and_absorbs_forward() {
    let mut it = empty::<u32, _>(Asc);

    assert!(!it.has_next());
    it.forward(&5).expect("forward on empty iterator should succeed");
    assert_eq!(it.next(), None);
}

#[test]
fn navigable_forward_skips_to_first_element_not_preceding_target() {
    let set: BTreeSet<u32> = [1, 3, 5, 7, 9].into_iter().collect();
    let mut it = iterate_navigable(Asc, &set);

    assert_eq!(it.next(), Some(1));
    it.forward(&4).expect("forward past last should succeed");

    assert_eq!(it.to_vec(), vec![5, 7, 9]);
}

#[test]
fn navigable_forward_behind_head_is_a_no_op() {
    counters_reset();
    let set: BTreeSet<u32> = [1, 3, 5].into_iter().collect();
    let mut it = iterate_navigable(Asc, &set);

    assert_eq!(it.next(), Some(1));
    assert_eq!(it.peek(), Some(&3));
    it.forward(&2).expect("forward behind head should succeed");

    assert_eq!(it.next(), Some(3));
    let ops = counters_report().origin(ErrorOrigin::Navigable);
    assert_eq!(ops.forwards_skipped, 1);
    assert_eq!(ops.forwards, 0);
}

#[test]
fn navigable_forward_to_last_does_not_replay_tie_group() {
    let rows: Vec<Row> = vec![(1, 'a'), (2, 'a'), (2, 'b'), (2, 'c'), (3, 'a')];
    let mut it = iterate_navigable(by_first(), &rows);

    assert_eq!(it.next(), Some((1, 'a')));
    assert_eq!(it.next(), Some((2, 'a')));
    it.forward(&(2, 'z')).expect("forward to a tied target should succeed");

    assert_eq!(it.to_vec(), vec![(2, 'b'), (2, 'c'), (3, 'a')]);
}

#[test]
fn navigable_forward_behind_last_is_rejected() {
    let values = vec![1, 3, 5];
    let mut it = iterate_navigable(Asc, &values);

    it.next();
    it.next();
    let err = it.forward(&2).expect_err("backward forward should fail");

    assert!(err.is_illegal_argument());
    assert_eq!(err.origin, ErrorOrigin::Navigable);
    assert_eq!(it.next(), Some(5));
}

#[test]
fn navigable_desc_walks_and_forwards_downwards() {
    let set: BTreeSet<u32> = [1, 3, 5, 7, 9].into_iter().collect();
    let mut it = iterate_navigable(Desc, &set);

    assert_eq!(it.next(), Some(9));
    it.forward(&6).expect("descending forward should succeed");

    assert_eq!(it.to_vec(), vec![5, 3, 1]);
}

#[test]
fn find_first_returns_match_and_always_recycles() {
    let set: BTreeSet<u32> = [2, 4, 6].into_iter().collect();

    let hit = iterate_navigable(Asc, &set)
        .find_first(&4)
        .expect("lookup should succeed");
    let miss = iterate_navigable(Asc, &set)
        .find_first(&5)
        .expect("lookup should succeed");
    assert_eq!(hit, Some(4));
    assert_eq!(miss, None);

    let (source, log) = probe(Asc, vec![1, 2, 3]);
    assert_eq!(source.find_first(&9).expect("lookup should succeed"), None);
    assert!(log.released());
}

#[test]
fn find_first_scans_the_comparator_tie_group() {
    let rows: Vec<Row> = vec![(1, 'a'), (2, 'a'), (2, 'b'), (3, 'a')];

    let inside = iterate_navigable(by_first(), &rows)
        .find_first(&(2, 'b'))
        .expect("lookup should succeed");
    let absent = iterate_navigable(by_first(), &rows)
        .find_first(&(2, 'z'))
        .expect("lookup should succeed");
    assert_eq!(inside, Some((2, 'b')));
    assert_eq!(absent, None);

    let (source, log) = probe(by_first(), rows);
    assert_eq!(
        source.find_first(&(2, 'c')).expect("lookup should succeed"),
        None
    );
    assert_eq!(log.pulls(), 2);
    assert!(log.released());
}

// ------------------------------------------------------------------
// Mapped
// ------------------------------------------------------------------

#[test]
fn map_projects_into_declared_order() {
    let ascending = iterate_sorted(Asc, vec![1, 2, 3]).map(|v| v * 10, Asc);
    let negated = iterate_sorted(Asc, vec![1, 2, 3]).map(|v: i32| -v, Desc);

    assert_eq!(ascending.to_vec(), vec![10, 20, 30]);
    assert_eq!(negated.to_vec(), vec![-1, -2, -3]);
}

#[test]
#[should_panic(expected = "out of ASC order")]
fn non_monotone_map_trips_order_check() {
    with_config(strict_checks(), || {
        iterate_sorted(Asc, vec![1, 2, 3]).map(|v| 10 - v, Asc).to_vec();
    });
}

#[test]
fn map_sorted_forward_matches_direct_seek_on_source() {
    let values = vec![1, 3, 5, 7, 9];

    let mut mapped =
        iterate_navigable(Asc, &values).map_sorted(|v| v * 2, |y: &i32| (y + 1) / 2, Asc);
    mapped.forward(&7).expect("mapped forward should succeed");

    let mut direct = iterate_navigable(Asc, &values);
    direct.forward(&4).expect("direct forward should succeed");

    assert_eq!(mapped.next(), direct.next().map(|v| v * 2));
    assert_eq!(mapped.next(), Some(14));
}

#[test]
fn map_sorted_forward_behind_last_is_rejected() {
    let values = vec![1, 2, 3];
    let mut mapped =
        iterate_navigable(Asc, &values).map_sorted(|v| v * 10, |y: &i32| y / 10, Asc);

    assert_eq!(mapped.next(), Some(10));
    assert_eq!(mapped.next(), Some(20));
    let err = mapped.forward(&5).expect_err("backward forward should fail");

    assert!(err.is_illegal_argument());
    assert_eq!(err.origin, ErrorOrigin::Mapped);
}

#[test]
fn map_recycle_reaches_upstream() {
    let (source, log) = probe(Asc, vec![1, 2, 3]);
    let mut mapped = source.map(|v| v + 1, Asc);

    assert_eq!(mapped.next(), Some(2));
    mapped.recycle();
    mapped.recycle();

    assert_eq!(log.recycles(), 1);
    assert!(!mapped.has_next());
}

// ------------------------------------------------------------------
// Filtered / Limited / TakeWhile
// ------------------------------------------------------------------

#[test]
fn filter_skips_rejected_elements_eagerly() {
    let (source, log) = probe(Asc, vec![1, 2, 3, 4, 5, 6]);
    let mut evens = source.filter(|v| v % 2 == 0);

    assert!(evens.has_next());
    assert_eq!(log.pulls(), 1);
    assert_eq!(evens.to_vec(), vec![2, 4, 6]);
}

#[test]
fn filter_forward_delegates_to_upstream() {
    let values: Vec<i32> = (1..=20).collect();
    let mut triples = iterate_navigable(Asc, &values).filter(|v| v % 3 == 0);

    assert_eq!(triples.next(), Some(3));
    triples.forward(&10).expect("filtered forward should succeed");

    assert_eq!(triples.next(), Some(12));
}

#[test]
fn filter_forward_behind_rejected_head_keeps_position() {
    let values = vec![2, 3, 5, 7, 8];
    let mut evens = iterate_navigable(Asc, &values).filter(|v| v % 2 == 0);

    assert_eq!(evens.next(), Some(2));
    assert_eq!(evens.peek(), Some(&8));
    evens.forward(&6).expect("forward between emitted elements should succeed");

    assert_eq!(evens.next(), Some(8));
}

#[test]
fn limit_with_on_consumed_fires_once_and_releases_eagerly() {
    let (source, log) = probe(Asc, vec![1, 2, 3, 4, 5]);
    let (fired, callback) = counter();
    let mut it = source.limit(2).on_consumed(callback);

    assert_eq!(it.next(), Some(1));
    assert!(!log.released());
    assert_eq!(it.next(), Some(2));
    assert_eq!(log.recycles(), 1);
    assert_eq!(fired.get(), 1);

    assert!(!it.has_next());
    it.recycle();
    assert_eq!(fired.get(), 1);
    assert_eq!(log.recycles(), 1);
    assert_eq!(log.pulls(), 2);
}

#[test]
fn limit_zero_releases_on_first_access() {
    let (source, log) = probe(Asc, vec![1, 2]);
    let mut it = source.limit(0);

    assert!(!log.released());
    assert!(!it.has_next());
    assert!(log.released());
}

#[test]
fn limit_forward_does_not_consume_budget() {
    let values: Vec<u32> = (1..=10).collect();
    let mut it = iterate_navigable(Asc, &values).limit(2);

    it.forward(&8).expect("forward should succeed");

    assert_eq!(it.remaining(), 2);
    assert_eq!(it.to_vec(), vec![8, 9]);
}

#[test]
fn take_while_stops_and_releases_on_first_failure() {
    let (source, log) = probe(Asc, vec![1, 2, 3, 10, 11]);
    let mut it = source.take_while(|v| *v < 5);

    assert_eq!(it.next(), Some(1));
    assert_eq!(it.next(), Some(2));
    assert_eq!(it.next(), Some(3));
    assert!(!log.released());

    assert!(!it.has_next());
    assert!(log.released());
    assert_eq!(it.next(), None);
}

#[test]
fn take_while_forwards_until_it_stops() {
    let (source, log) = probe(Asc, vec![1, 2, 3, 6, 7, 10]);
    let mut it = source.take_while(|v| *v < 8);

    assert_eq!(it.next(), Some(1));
    it.forward(&5).expect("forward before the stop should succeed");
    assert_eq!(it.next(), Some(6));
    assert_eq!(it.next(), Some(7));
    assert!(!it.has_next());
    assert!(log.released());

    it.forward(&20).expect("forward after the stop should succeed");
    assert_eq!(it.next(), None);
    assert_eq!(log.forwards(), 1);
}

// ------------------------------------------------------------------
// Distinct
// ------------------------------------------------------------------

#[test]
fn distinct_removes_duplicates() {
    counters_reset();
    let out = iterate_sorted(Asc, vec![1, 1, 2, 2, 2, 3]).distinct().to_vec();

    assert_eq!(out, vec![1, 2, 3]);
    assert_eq!(
        counters_report()
            .origin(ErrorOrigin::Distinct)
            .duplicates_suppressed,
        3
    );
}

#[test]
fn distinct_keeps_comparator_ties_that_differ_by_value() {
    let rows: Vec<Row> = vec![(1, 'a'), (1, 'b'), (1, 'a'), (2, 'a'), (2, 'a')];

    let out = iterate_sorted(by_first(), rows).distinct().to_vec();

    assert_eq!(out, vec![(1, 'a'), (1, 'b'), (2, 'a')]);
}

#[test]
fn distinct_forgets_tie_group_once_value_advances() {
    let rows: Vec<Row> = vec![(1, 'a'), (2, 'b'), (3, 'a')];

    let out = iterate_sorted(by_first(), rows).distinct().to_vec();

    assert_eq!(out, vec![(1, 'a'), (2, 'b'), (3, 'a')]);
}

#[test]
fn distinct_forward_delegates_to_upstream() {
    let values = vec![1, 1, 4, 4, 6, 9];
    let mut it = iterate_navigable(Asc, &values).distinct();

    assert_eq!(it.next(), Some(1));
    it.forward(&5).expect("distinct forward should succeed");

    assert_eq!(it.to_vec(), vec![6, 9]);
}

// ------------------------------------------------------------------
// Merged
// ------------------------------------------------------------------

#[test]
fn merge_preserves_duplicates_across_inputs() {
    let merged = iterate_sorted(Asc, vec![1, 3, 5]).merge([iterate_sorted(Asc, vec![2, 3, 6])]);

    assert_eq!(merged.to_vec(), vec![1, 2, 3, 3, 5, 6]);
}

#[test]
fn merge_descending_inputs() {
    let merged = iterate_sorted(Desc, vec![9, 5, 1]).merge([iterate_sorted(Desc, vec![8, 5, 2])]);

    assert_eq!(merged.to_vec(), vec![9, 8, 5, 5, 2, 1]);
}

#[test]
fn merge_opens_lazy_producer_on_first_access() {
    let opened = Rc::new(Cell::new(0));
    let handle = Rc::clone(&opened);
    let producer = (0..3).map(move |shard| {
        handle.set(handle.get() + 1);
        iterate_sorted(Asc, vec![shard, shard + 3])
    });

    let mut merged = merge(Asc, producer);
    assert_eq!(opened.get(), 0);

    assert!(merged.has_next());
    assert_eq!(opened.get(), 3);
    assert_eq!(merged.to_vec(), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn merge_of_no_inputs_is_empty() {
    let mut merged = merge(Asc, Vec::<Probe<u32, Asc>>::new());

    assert!(!merged.has_next());
    assert_eq!(merged.next(), None);
}

#[test]
fn merge_forward_moves_pending_and_heaped_inputs() {
    let left = vec![1, 4, 7, 10];
    let right = vec![2, 5, 8, 11];
    let mut merged = iterate_navigable(Asc, &left).merge([iterate_navigable(Asc, &right)]);

    assert_eq!(merged.next(), Some(1));
    merged.forward(&7).expect("merge forward should succeed");

    assert_eq!(merged.to_vec(), vec![7, 8, 10, 11]);
}

#[test]
fn merge_forward_behind_head_leaves_next_unchanged() {
    let left = vec![1, 5];
    let right = vec![3];
    let mut merged = iterate_navigable(Asc, &left).merge([iterate_navigable(Asc, &right)]);

    assert_eq!(merged.next(), Some(1));
    assert_eq!(merged.peek(), Some(&3));
    merged.forward(&3).expect("forward to head should succeed");

    assert_eq!(merged.to_vec(), vec![3, 5]);
}

#[test]
fn merge_forward_behind_last_is_rejected() {
    let left = vec![1, 4];
    let right = vec![2, 6];
    let mut merged = iterate_navigable(Asc, &left).merge([iterate_navigable(Asc, &right)]);

    merged.next();
    merged.next();
    let err = merged.forward(&1).expect_err("backward forward should fail");

    assert!(err.is_illegal_argument());
    assert_eq!(err.origin, ErrorOrigin::Merged);
}

#[test]
fn merge_recycle_releases_every_input_once() {
    let (left, left_log) = probe(Asc, vec![1, 2]);
    let (right, right_log) = probe(Asc, vec![3]);
    let mut merged = left.merge([right]);

    assert_eq!(merged.next(), Some(1));
    merged.recycle();
    merged.recycle();

    assert_eq!(left_log.recycles(), 1);
    assert_eq!(right_log.recycles(), 1);
    assert!(!merged.has_next());
}

#[test]
fn merge_exhaustion_releases_inputs() {
    let (left, left_log) = probe(Asc, vec![1]);
    let (right, right_log) = probe(Asc, vec![2]);
    let mut merged = left.merge([right]);

    while merged.next().is_some() {}

    assert!(!merged.has_next());
    assert!(left_log.released());
    assert!(right_log.released());
}

// ------------------------------------------------------------------
// Intersected
// ------------------------------------------------------------------

#[test]
fn intersect_keeps_shared_duplicates() {
    let left = vec![1, 2, 2, 4];
    let right = vec![2, 2, 5];

    let out = iterate_navigable(Asc, &left)
        .intersect([iterate_navigable(Asc, &right)])
        .to_vec();

    assert_eq!(out, vec![2, 2]);
}

#[test]
fn intersect_unions_comparator_ties_across_inputs() {
    let left: Vec<Row> = vec![(1, 'a'), (2, 'a'), (2, 'b')];
    let right: Vec<Row> = vec![(2, 'b'), (2, 'c'), (3, 'a')];

    let out = iterate_navigable(by_first(), &left)
        .intersect([iterate_navigable(by_first(), &right)])
        .to_vec();

    assert_eq!(out, vec![(2, 'a'), (2, 'b'), (2, 'c')]);
}

#[test]
fn intersect_three_inputs_in_descending_order() {
    // Slices are stored ascending; the order decides the walk direction.
    let a = vec![1, 3, 5, 7, 9];
    let b = vec![3, 4, 5, 9];
    let c = vec![0, 3, 9, 10];

    let out = intersect(
        Desc,
        [
            iterate_navigable(Desc, &a),
            iterate_navigable(Desc, &b),
            iterate_navigable(Desc, &c),
        ],
    )
    .to_vec();

    assert_eq!(out, vec![9, 3]);
}

#[test]
fn intersect_skips_instead_of_scanning() {
    let (dense, dense_log) = probe(Asc, (0..1_000).collect::<Vec<u32>>());
    let (sparse, _) = probe(Asc, vec![500, 900]);

    let out = dense.intersect([sparse]).to_vec();

    assert_eq!(out, vec![500, 900]);
    assert_eq!(dense_log.pulls(), 2);
    assert!(dense_log.forwards() > 0);
}

#[test]
fn intersect_of_no_inputs_is_empty() {
    let mut it = intersect(Asc, Vec::<Probe<u32, Asc>>::new());

    assert!(!it.has_next());
    it.forward(&3).expect("forward on empty intersection should succeed");
}

#[test]
fn intersect_forward_resets_candidate_search() {
    let all: Vec<u32> = (1..=10).collect();
    let evens = vec![2, 4, 6, 8, 10];
    let mut it = iterate_navigable(Asc, &all).intersect([iterate_navigable(Asc, &evens)]);

    assert_eq!(it.next(), Some(2));
    it.forward(&7).expect("intersection forward should succeed");
    assert_eq!(it.next(), Some(8));

    let err = it.forward(&5).expect_err("backward forward should fail");
    assert!(err.is_illegal_argument());
    assert_eq!(err.origin, ErrorOrigin::Intersected);
}

#[test]
fn intersect_exhaustion_releases_inputs() {
    let (left, left_log) = probe(Asc, vec![1, 2]);
    let (right, right_log) = probe(Asc, vec![2, 3]);
    let mut it = left.intersect([right]);

    assert_eq!(it.next(), Some(2));
    assert!(!it.has_next());

    assert!(left_log.released());
    assert!(right_log.released());
}

// ------------------------------------------------------------------
// Lifecycle
// ------------------------------------------------------------------

#[test]
fn on_consumed_fires_once_when_last_element_is_taken() {
    let (fired, callback) = counter();
    let mut it = iterate_sorted(Asc, vec![1, 2, 3]).on_consumed(callback);

    assert_eq!(it.next(), Some(1));
    assert_eq!(it.next(), Some(2));
    assert_eq!(fired.get(), 0);
    assert_eq!(it.next(), Some(3));
    assert_eq!(fired.get(), 1);

    assert!(!it.has_next());
    assert_eq!(fired.get(), 1);
}

#[test]
fn on_consumed_fires_on_early_recycle() {
    let (source, log) = probe(Asc, vec![1, 2, 3]);
    let (fired, callback) = counter();
    let mut it = source.on_consumed(callback);

    it.next();
    it.recycle();
    it.recycle();

    assert_eq!(fired.get(), 1);
    assert_eq!(log.recycles(), 1);
}

#[test]
fn on_consumed_fires_once_after_forward_past_end() {
    let (source, log) = probe(Asc, vec![1, 2, 3]);
    let (fired, callback) = counter();
    let mut it = source.on_consumed(callback);

    assert_eq!(it.next(), Some(1));
    it.forward(&10).expect("forward past the end should succeed");
    assert_eq!(log.forwards(), 1);
    assert_eq!(fired.get(), 0);

    assert!(!it.has_next());
    assert_eq!(it.next(), None);
    it.recycle();
    assert_eq!(fired.get(), 1);
    assert!(log.released());
}

#[test]
fn on_finalise_fires_once_on_recycle() {
    counters_reset();
    let (source, log) = probe(Asc, vec![1, 2, 3]);
    let (fired, callback) = counter();
    let mut it = source.on_finalise(callback);

    assert_eq!(it.next(), Some(1));
    it.recycle();
    assert!(it.is_finalised());
    drop(it);

    assert_eq!(fired.get(), 1);
    assert_eq!(log.recycles(), 1);
    assert_eq!(
        counters_report()
            .origin(ErrorOrigin::Lifecycle)
            .finalisers_on_drop,
        0
    );
}

#[test]
fn on_finalise_releases_on_drop_without_recycle() {
    counters_reset();
    let (source, log) = probe(Asc, vec![1, 2, 3]);
    let (fired, callback) = counter();

    {
        let mut it = source.on_finalise(callback);
        assert_eq!(it.next(), Some(1));
    }

    assert_eq!(fired.get(), 1);
    assert!(log.released());
    assert_eq!(
        counters_report()
            .origin(ErrorOrigin::Lifecycle)
            .finalisers_on_drop,
        1
    );
}

#[test]
fn lifecycle_wrappers_keep_forwardability() {
    let values: Vec<u32> = (1..=9).collect();
    let (fired, callback) = counter();
    let mut it = iterate_navigable(Asc, &values).on_finalise(callback);

    it.forward(&6).expect("forward through finaliser should succeed");
    assert_eq!(it.next(), Some(6));
    it.recycle();

    assert_eq!(fired.get(), 1);
}

// ------------------------------------------------------------------
// Drains and adapters
// ------------------------------------------------------------------

#[test]
fn drains_recycle_the_source() {
    let (source, log) = probe(Asc, vec![4, 5, 6]);

    assert_eq!(source.first(), Some(4));
    assert!(log.released());

    let (source, log) = probe(Asc, vec![4, 5, 6]);
    assert_eq!(source.count_remaining(), 3);
    assert!(log.released());
}

#[test]
fn std_iter_adapter_supports_std_combinators() {
    let (source, log) = probe(Asc, vec![1, 2, 3]);

    let doubled: Vec<u32> = source.into_std_iter().map(|v| v * 2).collect();

    assert_eq!(doubled, vec![2, 4, 6]);
    assert!(log.released());
}

#[test]
fn boxed_inputs_compose_heterogeneous_leaves() {
    let set: BTreeSet<u32> = [1, 4, 9].into_iter().collect();
    let values = vec![2, 4, 8];

    let out = iterate_navigable(Asc, &set)
        .boxed()
        .merge([iterate_navigable(Asc, &values).boxed()])
        .to_vec();

    assert_eq!(out, vec![1, 2, 4, 4, 8, 9]);
}

#[test]
fn composed_tree_stays_sorted_and_releases_all_leaves() {
    let (a, a_log) = probe(Asc, vec![1, 3, 5, 7, 9, 11]);
    let (b, b_log) = probe(Asc, vec![3, 4, 5, 9, 11]);
    let (c, c_log) = probe(Asc, vec![2, 5, 9]);

    let mut out = Vec::new();
    a.intersect([b])
        .boxed()
        .merge([c.boxed()])
        .distinct()
        .filter(|v| *v > 2)
        .limit(3)
        .for_each_remaining(|v| out.push(v));

    assert_eq!(out, vec![3, 5, 9]);
    assert!(a_log.released());
    assert!(b_log.released());
    assert!(c_log.released());
}

//! Policy Instance Tests.
//!
//! Exercises `track_access` and `evict` on single instances: counter updates,
//! per-task attribution, eviction order and the refusal guard.

use pagesim_core::PolicyKind;
use pagesim_core::sim::{Access, PolicyInstance};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::{access, accesses, evict, t1, task};

fn run(kind: PolicyKind, pages: &[u64]) -> PolicyInstance {
    let mut inst = PolicyInstance::new(kind);
    for event in accesses(pages) {
        let _ = inst.track_access(&event);
    }
    inst
}

#[test]
fn lru_scenario_evicts_least_recently_used() {
    let mut inst = PolicyInstance::new(PolicyKind::Lru);
    assert_eq!(inst.track_access(&access(1, t1())), Access::Miss);
    assert_eq!(inst.track_access(&access(2, t1())), Access::Miss);
    assert_eq!(inst.track_access(&access(1, t1())), Access::Hit);
    assert_eq!(
        inst.track_access(&evict(1)),
        Access::Evicted { evicted: 1 }
    );

    assert_eq!(inst.residency().pages(), vec![1]);
    assert_eq!(inst.totals().hits, 1);
    assert_eq!(inst.totals().misses, 2);
}

#[rstest]
#[case(PolicyKind::Fifo)]
#[case(PolicyKind::Lru)]
#[case(PolicyKind::Mru)]
#[case(PolicyKind::Lfu)]
fn eviction_notice_does_not_count(#[case] kind: PolicyKind) {
    let mut inst = run(kind, &[1, 2, 3]);
    let before = inst.totals();
    let _ = inst.track_access(&evict(1));
    assert_eq!(inst.totals(), before);
    assert_eq!(inst.residency().len(), 2);
    assert_eq!(inst.evicted(), 1);
}

#[rstest]
#[case(PolicyKind::Fifo)]
#[case(PolicyKind::Lru)]
#[case(PolicyKind::Mru)]
#[case(PolicyKind::Lfu)]
fn evict_at_or_above_size_is_a_noop(#[case] kind: PolicyKind) {
    let mut inst = run(kind, &[1, 2, 3, 1]);
    let pages = inst.residency().pages();
    let totals = inst.totals();

    assert_eq!(inst.evict(3), 0);
    assert_eq!(inst.evict(100), 0);
    assert_eq!(
        inst.track_access(&evict(u64::MAX)),
        Access::Evicted { evicted: 0 }
    );

    assert_eq!(inst.residency().pages(), pages);
    assert_eq!(inst.totals(), totals);
    assert_eq!(inst.evicted(), 0);
}

#[test]
fn evict_on_empty_structure_is_a_noop() {
    let mut inst = PolicyInstance::new(PolicyKind::Fifo);
    assert_eq!(inst.evict(0), 0);
    assert_eq!(inst.evict(1), 0);
    assert!(inst.residency().is_empty());
}

#[test]
fn fifo_evicts_in_insertion_order() {
    let mut inst = run(PolicyKind::Fifo, &[10, 20, 30, 40, 10, 20]);
    assert_eq!(inst.evict(1), 1);
    assert_eq!(inst.residency().pages(), vec![20, 30, 40]);
    assert_eq!(inst.evict(2), 2);
    assert_eq!(inst.residency().pages(), vec![40]);
}

#[test]
fn mru_evicts_most_recent() {
    let mut inst = run(PolicyKind::Mru, &[1, 2, 3, 2]);
    assert_eq!(inst.evict(1), 1);
    assert_eq!(inst.residency().pages(), vec![3, 1]);
}

#[test]
fn lru_recent_hit_survives_next_eviction() {
    let mut inst = run(PolicyKind::Lru, &[1, 2, 3, 4, 1]);
    assert_eq!(inst.evict(1), 1);
    assert!(inst.residency().find(1).is_some());
    assert!(inst.residency().find(2).is_none());
}

#[test]
fn hits_and_misses_are_attributed_per_task() {
    let a = task(100, "cat");
    let b = task(200, "grep");
    let mut inst = PolicyInstance::new(PolicyKind::Lru);
    for event in [access(1, a), access(1, b), access(2, b), access(1, a)] {
        let _ = inst.track_access(&event);
    }

    let rows: Vec<(u32, u64, u64)> = inst
        .tasks()
        .iter()
        .map(|e| (e.key.pid, e.counters.hits, e.counters.misses))
        .collect();
    assert_eq!(rows, vec![(100, 1, 1), (200, 1, 1)]);
    assert_eq!(inst.totals().hits, 2);
    assert_eq!(inst.totals().misses, 2);
}

#[rstest]
#[case(PolicyKind::Fifo)]
#[case(PolicyKind::Lru)]
#[case(PolicyKind::Mru)]
#[case(PolicyKind::Lfu)]
fn capacity_trims_from_head(#[case] kind: PolicyKind) {
    let mut inst = PolicyInstance::with_capacity(kind, Some(2));
    for event in accesses(&[1, 2, 3, 4, 5]) {
        let _ = inst.track_access(&event);
    }
    assert_eq!(inst.residency().len(), 2);
    assert_eq!(inst.evicted(), 3);
    assert_eq!(inst.totals().misses, 5);
}

#[rstest]
#[case(PolicyKind::Fifo)]
#[case(PolicyKind::Lru)]
#[case(PolicyKind::Mru)]
#[case(PolicyKind::Lfu)]
fn full_structure_admits_the_missed_page(#[case] kind: PolicyKind) {
    let mut inst = PolicyInstance::with_capacity(kind, Some(2));
    let outcomes: Vec<Access> = accesses(&[1, 2, 3, 3, 3, 3])
        .iter()
        .map(|event| inst.track_access(event))
        .collect();

    assert_eq!(
        outcomes,
        vec![
            Access::Miss,
            Access::Miss,
            Access::Miss,
            Access::Hit,
            Access::Hit,
            Access::Hit
        ]
    );
    assert!(inst.residency().find(3).is_some());
    assert_eq!(inst.residency().len(), 2);
    assert_eq!(inst.totals().hits, 3);
    assert_eq!(inst.evicted(), 1);
}

#[test]
fn zero_capacity_means_unbounded() {
    let inst = {
        let mut inst = PolicyInstance::with_capacity(PolicyKind::Fifo, Some(0));
        for event in accesses(&[1, 2, 3]) {
            let _ = inst.track_access(&event);
        }
        inst
    };
    assert_eq!(inst.residency().len(), 3);
}

#[test]
fn summary_reports_size_and_counters() {
    let inst = run(PolicyKind::Mru, &[1, 2, 1]);
    let summary = inst.summary();
    assert_eq!(summary.size, 2);
    assert_eq!(summary.hits, 1);
    assert_eq!(summary.misses, 2);
    assert_eq!(summary.to_string(), "MRU  Size: 2, Hits: 1, Misses: 2");
}

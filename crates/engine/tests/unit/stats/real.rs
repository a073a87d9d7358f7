//! Real-Behavior Accountant Tests.
//!
//! The reconciliation formula, its clamping rules and per-task accumulation.

use pagesim_core::stats::{HitRate, RealAccountant, RealCounters, RealOutcome};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::{access, added, buffer_dirtied, dirtied, evict, task};

fn counters(accessed: u64, added: u64, dirtied: u64, buffer_dirtied: u64) -> RealCounters {
    RealCounters {
        accessed,
        added,
        dirtied,
        buffer_dirtied,
    }
}

#[test]
fn reconciles_a_typical_task() {
    let outcome = counters(10, 4, 1, 2).reconcile();
    assert_eq!(
        outcome,
        RealOutcome {
            total: 8,
            hits: 5,
            misses: 3
        }
    );
    assert_eq!(outcome.rate(), HitRate::Percent(62.5));
}

#[rstest]
#[case::more_buffer_dirties_than_accesses(counters(2, 0, 0, 5), 0, 0, 0)]
#[case::more_dirties_than_adds(counters(4, 1, 3, 0), 4, 4, 0)]
#[case::misses_exceed_total(counters(3, 9, 0, 0), 3, 0, 3)]
#[case::everything_zero(RealCounters::default(), 0, 0, 0)]
fn clamps_negative_intermediates(
    #[case] raw: RealCounters,
    #[case] total: u64,
    #[case] hits: u64,
    #[case] misses: u64,
) {
    assert_eq!(
        raw.reconcile(),
        RealOutcome {
            total,
            hits,
            misses
        }
    );
}

#[test]
fn zero_total_has_no_rate() {
    assert_eq!(counters(1, 0, 0, 1).reconcile().rate(), HitRate::NoData);
}

#[test]
fn events_land_on_their_task() {
    let a = task(1, "a");
    let b = task(2, "b");
    let mut real = RealAccountant::new();
    for event in [
        access(1, a),
        access(1, a),
        added(1, a),
        dirtied(1, b),
        buffer_dirtied(1, b),
        evict(3),
    ] {
        real.record(&event);
    }

    assert_eq!(real.tasks().len(), 2);
    assert_eq!(real.tasks().get(&a.key()), Some(&counters(2, 1, 0, 0)));
    assert_eq!(real.tasks().get(&b.key()), Some(&counters(0, 0, 1, 1)));
}

#[test]
fn aggregate_reconciles_summed_counters() {
    let a = task(1, "a");
    let b = task(2, "b");
    let mut real = RealAccountant::new();
    // a alone: 10 accesses, 5 dirties -> total 10, misses 0
    for page in 0..10 {
        real.record(&access(page, a));
    }
    for page in 0..5 {
        real.record(&dirtied(page, a));
    }
    // b alone: 10 accesses, 5 adds -> total 10, misses 5
    for page in 10..20 {
        real.record(&access(page, b));
    }
    for page in 20..25 {
        real.record(&added(page, b));
    }

    assert_eq!(real.totals(), counters(20, 5, 5, 0));
    // Summed: misses = 5 - 5 = 0, so every access is a hit. Clamping each task
    // first and then summing would give 15 of 20 instead.
    assert_eq!(
        real.aggregate(),
        RealOutcome {
            total: 20,
            hits: 20,
            misses: 0
        }
    );
    assert_eq!(real.aggregate().rate(), HitRate::Percent(100.0));
}

#[test]
fn aggregate_clamps_the_summed_counters() {
    let a = task(1, "a");
    let mut real = RealAccountant::new();
    for event in [access(1, a), added(2, a), added(3, a), buffer_dirtied(1, a)] {
        real.record(&event);
    }
    assert_eq!(real.aggregate(), RealOutcome::default());
    assert_eq!(real.aggregate().rate(), HitRate::NoData);
}

#[test]
fn empty_accountant_has_no_data() {
    let real = RealAccountant::new();
    assert!(real.tasks().is_empty());
    assert_eq!(real.aggregate().rate(), HitRate::NoData);
}

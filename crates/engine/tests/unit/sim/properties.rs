//! Simulation Invariants.
//!
//! Randomized event streams checked against the counting and sizing rules every
//! policy must obey.

use pagesim_core::event::{Event, EventKind};
use pagesim_core::{PolicyKind, Simulation};
use proptest::prelude::*;

use crate::common::builder::task;

fn arb_event() -> impl Strategy<Value = Event> {
    (0u32..5, 0u64..32, 1u32..4).prop_map(|(tag, value, pid)| {
        let kind = EventKind::from_tag(tag).unwrap_or(EventKind::AccessHit);
        let value = if kind == EventKind::EvictionNotice {
            value % 8
        } else {
            value
        };
        Event::new(kind, task(pid, "p"), value)
    })
}

proptest! {
    #[test]
    fn hits_plus_misses_equal_page_events(events in prop::collection::vec(arb_event(), 0..200)) {
        let mut sim = Simulation::default();
        sim.replay(&events);

        let page_events = events.iter().filter(|e| !e.is_eviction()).count() as u64;
        for policy in sim.policies() {
            prop_assert_eq!(policy.totals().total(), page_events);
            let per_task: u64 = policy.tasks().iter().map(|e| e.counters.total()).sum();
            prop_assert_eq!(per_task, page_events);
        }
    }

    #[test]
    fn residency_never_exceeds_distinct_pages(events in prop::collection::vec(arb_event(), 0..200)) {
        let mut sim = Simulation::default();
        sim.replay(&events);

        let mut distinct: Vec<u64> = events
            .iter()
            .filter(|e| !e.is_eviction())
            .map(|e| e.value)
            .collect();
        distinct.sort_unstable();
        distinct.dedup();

        for policy in sim.policies() {
            let mut pages = policy.residency().pages();
            prop_assert!(pages.len() <= distinct.len());
            pages.sort_unstable();
            pages.dedup();
            prop_assert_eq!(pages.len(), policy.residency().len());
        }
    }

    #[test]
    fn replay_is_deterministic(events in prop::collection::vec(arb_event(), 0..100)) {
        let mut first = Simulation::default();
        let mut second = Simulation::default();
        first.replay(&events);
        second.replay(&events);
        prop_assert_eq!(first.report(), second.report());
    }

    #[test]
    fn real_hits_never_exceed_total(events in prop::collection::vec(arb_event(), 0..200)) {
        let mut sim = Simulation::default();
        sim.replay(&events);
        let outcome = sim.real().aggregate();
        prop_assert_eq!(outcome.hits + outcome.misses, outcome.total);
    }

    #[test]
    fn lfu_head_has_the_lowest_frequency(pages in prop::collection::vec(0u64..16, 1..100)) {
        let mut sim = Simulation::default();
        let events: Vec<Event> = pages
            .iter()
            .map(|&p| Event::page(EventKind::AccessHit, p, task(1, "p")))
            .collect();
        sim.replay(&events);

        let lfu = sim.policy(PolicyKind::Lfu).expect("lfu");
        let freqs: Vec<u64> = lfu
            .residency()
            .iter()
            .map(|(_, e)| e.frequency.unwrap_or_default())
            .collect();
        prop_assert!(freqs.windows(2).all(|w| w[0] <= w[1]));
    }
}

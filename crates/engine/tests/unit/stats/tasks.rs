//! Task Aggregation Table Tests.

use pagesim_core::common::{Command, TaskIdentity};
use pagesim_core::stats::{HitCounters, TaskTable};
use pretty_assertions::assert_eq;

use crate::common::builder::task;

#[test]
fn entries_are_created_in_first_seen_order() {
    let mut table = TaskTable::<HitCounters>::new();
    table.record_miss(&task(30, "c"));
    table.record_miss(&task(10, "a"));
    table.record_hit(&task(30, "c"));
    table.record_hit(&task(20, "b"));

    let pids: Vec<u32> = table.iter().map(|e| e.key.pid).collect();
    assert_eq!(pids, vec![30, 10, 20]);
    assert_eq!(
        table.get(&task(30, "c").key()),
        Some(&HitCounters { hits: 1, misses: 1 })
    );
}

#[test]
fn first_command_name_sticks() {
    let mut table = TaskTable::<HitCounters>::new();
    table.record_miss(&task(7, "bash"));
    table.record_hit(&task(7, "vim"));

    assert_eq!(table.len(), 1);
    let entry = table.iter().next().expect("entry");
    assert_eq!(entry.command, Command::from_name("bash"));
    assert_eq!(entry.counters.total(), 2);
}

#[test]
fn uid_is_part_of_the_key() {
    let mut table = TaskTable::<HitCounters>::new();
    table.record_miss(&TaskIdentity::new(0, 5, Command::from_name("x")));
    table.record_miss(&TaskIdentity::new(1, 5, Command::from_name("x")));
    assert_eq!(table.len(), 2);
}

#[test]
fn unseen_task_has_no_entry() {
    let table = TaskTable::<HitCounters>::new();
    assert!(table.is_empty());
    assert_eq!(table.get(&task(1, "x").key()), None);
}

#[test]
fn counters_rate() {
    let counters = HitCounters { hits: 3, misses: 1 };
    assert_eq!(counters.total(), 4);
    assert_eq!(counters.rate().percent(), Some(75.0));
    assert_eq!(HitCounters::default().rate().percent(), None);
}

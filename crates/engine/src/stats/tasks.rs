//! Per-task aggregation table.
//!
//! Maps the `(uid, pid)` key of each originating task to accumulated counters.
//! Entries are created lazily on the first event for a key, never removed, and
//! iterated in first-seen order. The command name shown for a task is the one
//! reported with its first event.

use std::collections::HashMap;

use crate::common::{Command, TaskIdentity, TaskKey};

use super::HitCounters;

/// One row of a [`TaskTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationEntry<V> {
    /// Aggregation key.
    pub key: TaskKey,
    /// Command name used for display.
    pub command: Command,
    /// Accumulated counters.
    pub counters: V,
}

/// Insertion-ordered map from task to counters.
#[derive(Debug, Clone)]
pub struct TaskTable<V = HitCounters> {
    entries: Vec<AggregationEntry<V>>,
    index: HashMap<TaskKey, usize>,
}

impl<V> Default for TaskTable<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V: Default> TaskTable<V> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counters for `task`, creating a zeroed entry on first sight.
    pub fn entry(&mut self, task: &TaskIdentity) -> &mut V {
        let key = task.key();
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.entries.push(AggregationEntry {
                    key,
                    command: task.command,
                    counters: V::default(),
                });
                let _ = self.index.insert(key, idx);
                idx
            }
        };
        &mut self.entries[idx].counters
    }
}

impl<V> TaskTable<V> {
    /// Looks up the counters for a key.
    pub fn get(&self, key: &TaskKey) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.entries[idx].counters)
    }

    /// Number of distinct tasks seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no task has been seen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &AggregationEntry<V>> {
        self.entries.iter()
    }
}

impl TaskTable<HitCounters> {
    /// Records a hit for `task`.
    pub fn record_hit(&mut self, task: &TaskIdentity) {
        self.entry(task).hits += 1;
    }

    /// Records a miss for `task`.
    pub fn record_miss(&mut self, task: &TaskIdentity) {
        self.entry(task).misses += 1;
    }
}

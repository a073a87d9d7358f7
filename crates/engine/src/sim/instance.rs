//! Policy instance: one replacement discipline replayed over the event stream.
//!
//! An instance binds a [`ResidencyList`], a [`ReplacementPolicy`], its own
//! [`TaskTable`] and global hit/miss counters. Instances never share entries or
//! counters with each other.

use std::fmt;

use tracing::debug;

use crate::cache::ResidencyList;
use crate::cache::policies::{PolicyKind, ReplacementPolicy};
use crate::event::{Event, Payload};
use crate::stats::{HitCounters, TaskTable};

/// Outcome of tracking one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The page was resident.
    Hit,
    /// The page was not resident and has been inserted.
    Miss,
    /// The event was an eviction notice; `evicted` entries were removed.
    Evicted {
        /// Number of entries actually removed (0 when the request was refused).
        evicted: usize,
    },
}

/// One simulated policy with its own residency order and statistics.
#[derive(Debug)]
pub struct PolicyInstance {
    policy: Box<dyn ReplacementPolicy>,
    list: ResidencyList,
    tasks: TaskTable,
    totals: HitCounters,
    capacity: Option<usize>,
    evicted: u64,
}

impl PolicyInstance {
    /// Creates an unbounded instance of the given policy.
    pub fn new(kind: PolicyKind) -> Self {
        Self {
            policy: kind.build(),
            list: ResidencyList::new(),
            tasks: TaskTable::new(),
            totals: HitCounters::default(),
            capacity: None,
            evicted: 0,
        }
    }

    /// Creates an instance that never holds more than `capacity` pages.
    ///
    /// When a miss arrives at a full structure, the head is removed first and the
    /// missed page is then inserted, so a newly admitted page is always resident.
    ///
    /// A capacity of `None` (or zero) leaves the structure unbounded.
    pub fn with_capacity(kind: PolicyKind, capacity: Option<usize>) -> Self {
        Self {
            capacity: capacity.filter(|&c| c > 0),
            ..Self::new(kind)
        }
    }

    /// Which policy this instance simulates.
    pub fn kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    /// Processes one event.
    ///
    /// Eviction notices trim the structure and leave the counters alone. Every
    /// other kind is looked up by page handle and counted as a hit or a miss for
    /// both the instance and the event's task.
    pub fn track_access(&mut self, event: &Event) -> Access {
        let page = match event.payload() {
            Payload::Evicted(count) => {
                let n = usize::try_from(count).unwrap_or(usize::MAX);
                return Access::Evicted {
                    evicted: self.evict(n),
                };
            }
            Payload::Page(page) => page,
        };

        if let Some(id) = self.list.find(page) {
            self.totals.hits += 1;
            self.tasks.record_hit(&event.subject);
            self.policy.on_hit(&mut self.list, id);
            Access::Hit
        } else {
            self.totals.misses += 1;
            self.tasks.record_miss(&event.subject);
            self.make_room();
            self.policy.on_miss(&mut self.list, page);
            Access::Miss
        }
    }

    /// Removes `n` entries from the head.
    ///
    /// A request to remove as many entries as are resident, or more, is refused and
    /// nothing is removed. Returns the number of entries removed.
    pub fn evict(&mut self, n: usize) -> usize {
        let size = self.list.len();
        if n >= size {
            debug!(policy = %self.kind(), requested = n, size, "eviction request refused");
            return 0;
        }
        self.remove_head(n);
        debug!(policy = %self.kind(), evicted = n, size = self.list.len(), "evicted");
        n
    }

    /// Trims the head so the page about to be inserted fits within the capacity.
    ///
    /// Trimming happens before insertion: policies that insert at the head would
    /// otherwise lose the new page immediately.
    fn make_room(&mut self) {
        if let Some(cap) = self.capacity {
            let excess = (self.list.len() + 1).saturating_sub(cap);
            self.remove_head(excess);
        }
    }

    fn remove_head(&mut self, n: usize) {
        for _ in 0..n {
            if self.list.pop_front().is_none() {
                break;
            }
            self.evicted += 1;
        }
    }

    /// The residency order, head (next victim) first.
    pub const fn residency(&self) -> &ResidencyList {
        &self.list
    }

    /// Per-task hit/miss counters.
    pub const fn tasks(&self) -> &TaskTable {
        &self.tasks
    }

    /// Global hit/miss counters.
    pub const fn totals(&self) -> HitCounters {
        self.totals
    }

    /// Total entries removed by eviction notices and capacity trimming.
    pub const fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Size and counters, for diagnostics.
    pub fn summary(&self) -> Summary {
        Summary {
            policy: self.kind(),
            size: self.list.len(),
            hits: self.totals.hits,
            misses: self.totals.misses,
        }
    }
}

/// Snapshot of an instance's size and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Policy of the instance.
    pub policy: PolicyKind,
    /// Resident entries.
    pub size: usize,
    /// Global hits.
    pub hits: u64,
    /// Global misses.
    pub misses: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} Size: {}, Hits: {}, Misses: {}",
            self.policy, self.size, self.hits, self.misses
        )
    }
}

//! Real-Behavior Accountant.
//!
//! The kernel never reports a hit or a miss directly. It reports page lifecycle
//! signals, and the hit rate is reconciled from four raw per-task counters:
//!
//! ```text
//! total  = accessed - buffer_dirtied     (clamped at 0)
//! misses = added - dirtied               (clamped at 0)
//! hits   = total - misses                (if negative: misses = total, hits = 0)
//! rate   = 100 * hits / total            (no data when total == 0)
//! ```
//!
//! `accessed` overcounts because every buffer write also marks the page accessed,
//! and `added` overcounts misses for the same reason on the dirtying path. The
//! result is an approximation; negative intermediates are clamped, not reported.

use serde::Serialize;

use super::{HitRate, TaskTable};
use crate::event::{Event, EventKind};

/// Raw kernel signal counts for one task. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RealCounters {
    /// `folio_mark_accessed` calls.
    pub accessed: u64,
    /// `filemap_add_folio` calls.
    pub added: u64,
    /// `__folio_mark_dirty` calls on mapped folios.
    pub dirtied: u64,
    /// `mark_buffer_dirty` calls.
    pub buffer_dirtied: u64,
}

/// Reconciled hit/miss figures derived from [`RealCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RealOutcome {
    /// Access attempts excluding write-induced accesses.
    pub total: u64,
    /// Estimated hits.
    pub hits: u64,
    /// Estimated misses.
    pub misses: u64,
}

impl RealOutcome {
    /// Hit percentage, or no data when `total` is zero.
    pub fn rate(&self) -> HitRate {
        HitRate::from_counts(self.hits, self.total)
    }
}

impl std::ops::AddAssign for RealCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.accessed += rhs.accessed;
        self.added += rhs.added;
        self.dirtied += rhs.dirtied;
        self.buffer_dirtied += rhs.buffer_dirtied;
    }
}

impl RealCounters {
    /// Counts one event. Eviction notices carry no per-task signal and are ignored.
    pub const fn record(&mut self, kind: EventKind) {
        match kind {
            EventKind::AccessHit => self.accessed += 1,
            EventKind::CacheMiss => self.added += 1,
            EventKind::WriteDirtyMark => self.dirtied += 1,
            EventKind::BufferDirtyMark => self.buffer_dirtied += 1,
            EventKind::EvictionNotice => {}
        }
    }

    /// Applies the reconciliation formula.
    pub const fn reconcile(&self) -> RealOutcome {
        let total = self.accessed.saturating_sub(self.buffer_dirtied);
        let misses = self.added.saturating_sub(self.dirtied);
        if misses > total {
            RealOutcome {
                total,
                hits: 0,
                misses: total,
            }
        } else {
            RealOutcome {
                total,
                hits: total - misses,
                misses,
            }
        }
    }
}

/// Accumulates raw kernel signals per task.
#[derive(Debug, Clone, Default)]
pub struct RealAccountant {
    tasks: TaskTable<RealCounters>,
}

impl RealAccountant {
    /// Creates an empty accountant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one event against its subject.
    pub fn record(&mut self, event: &Event) {
        if event.is_eviction() {
            return;
        }
        self.tasks.entry(&event.subject).record(event.kind);
    }

    /// Per-task raw counters, in first-seen order.
    pub const fn tasks(&self) -> &TaskTable<RealCounters> {
        &self.tasks
    }

    /// Raw counters summed over every task.
    pub fn totals(&self) -> RealCounters {
        let mut sum = RealCounters::default();
        for entry in self.tasks.iter() {
            sum += entry.counters;
        }
        sum
    }

    /// The reconciliation formula applied once to the summed raw counters.
    pub fn aggregate(&self) -> RealOutcome {
        self.totals().reconcile()
    }
}

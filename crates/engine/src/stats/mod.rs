//! Hit/miss statistics.
//!
//! This module tracks and derives the numbers the comparison is built from. It provides:
//! 1. **Rates:** [`HitRate`], a percentage or an explicit "no data" value.
//! 2. **Aggregation:** [`TaskTable`], per-task hit/miss counters in first-seen order.
//! 3. **Real behavior:** [`RealAccountant`], the kernel's reconciled hit rate.
//! 4. **Reporting:** [`Report`], the comparative table across policies.

/// Real-behavior accountant.
pub mod real;
/// Comparative reporter.
pub mod report;
/// Per-task aggregation table.
pub mod tasks;

use std::fmt;

use serde::{Serialize, Serializer};

pub use real::{RealAccountant, RealCounters, RealOutcome};
pub use report::{Report, ReportRow};
pub use tasks::{AggregationEntry, TaskTable};

/// A hit percentage, or no data when nothing was counted.
///
/// A zero denominator never produces NaN; it produces [`HitRate::NoData`], which
/// prints as `-` and serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitRate {
    /// Hits as a percentage of the total, in `0.0..=100.0`.
    Percent(f64),
    /// The denominator was zero.
    NoData,
}

impl HitRate {
    /// Computes `100 * hits / total`.
    ///
    /// # Arguments
    ///
    /// * `hits` - Number of hits.
    /// * `total` - Number of accesses; `hits` must not exceed it.
    pub fn from_counts(hits: u64, total: u64) -> Self {
        if total == 0 {
            Self::NoData
        } else {
            Self::Percent(100.0 * hits as f64 / total as f64)
        }
    }

    /// Returns the percentage, if any.
    pub const fn percent(self) -> Option<f64> {
        match self {
            Self::Percent(p) => Some(p),
            Self::NoData => None,
        }
    }
}

impl fmt::Display for HitRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `Formatter::pad` would treat the precision as a truncation length.
        let text = match self {
            Self::Percent(p) => {
                let prec = f.precision().unwrap_or(2);
                format!("{p:.prec$}")
            }
            Self::NoData => "-".to_owned(),
        };
        let Some(w) = f.width() else {
            return f.write_str(&text);
        };
        match f.align() {
            Some(fmt::Alignment::Right) => write!(f, "{text:>w$}"),
            Some(fmt::Alignment::Center) => write!(f, "{text:^w$}"),
            _ => write!(f, "{text:<w$}"),
        }
    }
}

impl Serialize for HitRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Percent(p) => serializer.serialize_some(p),
            Self::NoData => serializer.serialize_none(),
        }
    }
}

/// A hit/miss pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HitCounters {
    /// Number of simulated hits.
    pub hits: u64,
    /// Number of simulated misses.
    pub misses: u64,
}

impl HitCounters {
    /// Hits plus misses.
    #[inline]
    pub const fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit percentage over `hits + misses`.
    pub fn rate(&self) -> HitRate {
        HitRate::from_counts(self.hits, self.total())
    }
}

impl std::ops::AddAssign for HitCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.hits += rhs.hits;
        self.misses += rhs.misses;
    }
}

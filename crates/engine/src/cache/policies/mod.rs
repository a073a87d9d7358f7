//! Page Replacement Policies.
//!
//! Implements the idealized disciplines replayed against the observed access stream.
//! Every policy evicts from the head of the [`ResidencyList`]; they differ only in
//! where a missed page is inserted and how a hit entry is reordered.
//!
//! # Policies
//!
//! | Policy | on_hit                                   | on_miss              |
//! |--------|------------------------------------------|----------------------|
//! | `Fifo` | no reordering                            | insert at tail       |
//! | `Lru`  | move to tail                             | insert at tail       |
//! | `Mru`  | move to head                             | insert at head       |
//! | `Lfu`  | bump frequency, re-splice by frequency   | insert at head, f=0  |

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Frequently Used replacement policy.
pub mod lfu;

/// Least Recently Used replacement policy.
pub mod lru;

/// Most Recently Used replacement policy.
pub mod mru;

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EntryId, ResidencyList};

pub use fifo::FifoPolicy;
pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use mru::MruPolicy;

/// Trait for page replacement policies.
///
/// Defines how the residency order reacts to hits and misses. Victim selection is
/// not part of the trait: eviction always takes the head.
pub trait ReplacementPolicy: Send + Sync + fmt::Debug {
    /// Which discipline this is.
    fn kind(&self) -> PolicyKind;

    /// Reorders the list after `id` was hit.
    ///
    /// # Arguments
    ///
    /// * `list` - The residency list owned by the policy instance.
    /// * `id` - The entry that matched the accessed page.
    fn on_hit(&mut self, list: &mut ResidencyList, id: EntryId);

    /// Inserts a page that was not resident.
    ///
    /// # Arguments
    ///
    /// * `list` - The residency list owned by the policy instance.
    /// * `page` - The handle of the missed page.
    fn on_miss(&mut self, list: &mut ResidencyList, page: u64);
}

/// The closed set of simulated policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PolicyKind {
    /// First In First Out.
    #[serde(alias = "Fifo")]
    Fifo,
    /// Least Recently Used.
    #[serde(alias = "Lru")]
    Lru,
    /// Most Recently Used.
    #[serde(alias = "Mru")]
    Mru,
    /// Least Frequently Used.
    #[serde(alias = "Lfu")]
    Lfu,
}

impl PolicyKind {
    /// Every policy, in the order instances are created and reported.
    pub const ALL: [Self; 4] = [Self::Fifo, Self::Lru, Self::Mru, Self::Lfu];

    /// Upper-case label used in report headers.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fifo => "FIFO",
            Self::Lru => "LRU",
            Self::Mru => "MRU",
            Self::Lfu => "LFU",
        }
    }

    /// Creates the policy implementation for this kind.
    pub fn build(self) -> Box<dyn ReplacementPolicy> {
        match self {
            Self::Fifo => Box::new(FifoPolicy),
            Self::Lru => Box::new(LruPolicy),
            Self::Mru => Box::new(MruPolicy),
            Self::Lfu => Box::new(LfuPolicy),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

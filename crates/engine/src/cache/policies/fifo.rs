//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! Pages are evicted in the order they were inserted, regardless of how often or
//! how recently they were accessed afterwards. New pages go to the tail, so the
//! oldest page is always at the head.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_hit()`: O(1), no reordering
//!   - `on_miss()`: O(1)
//! - **Best Case:** Streaming accesses where all pages have equal importance
//! - **Worst Case:** Workloads with a hot working set (hot pages age out anyway)

use super::{PolicyKind, ReplacementPolicy};
use crate::cache::{EntryId, PageEntry, ResidencyList};

/// FIFO policy. Stateless: the list order is the insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoPolicy;

impl ReplacementPolicy for FifoPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Fifo
    }

    /// Hits do not change the eviction order.
    fn on_hit(&mut self, _list: &mut ResidencyList, _id: EntryId) {}

    fn on_miss(&mut self, list: &mut ResidencyList, page: u64) {
        let _ = list.push_back(PageEntry {
            page,
            frequency: None,
        });
    }
}

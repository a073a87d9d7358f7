//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the page that has not been accessed for the longest time.
//! Both new and re-accessed pages are placed at the tail, so the head always holds
//! the least recently used page.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_hit()`: O(1) relink
//!   - `on_miss()`: O(1)
//! - **Best Case:** Accesses with good temporal locality
//! - **Worst Case:** Scans larger than the resident set (thrashing)

use super::{PolicyKind, ReplacementPolicy};
use crate::cache::{EntryId, PageEntry, ResidencyList};

/// LRU policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

impl ReplacementPolicy for LruPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Lru
    }

    /// Moves the hit entry to the tail (most protected position).
    fn on_hit(&mut self, list: &mut ResidencyList, id: EntryId) {
        list.move_to_back(id);
    }

    fn on_miss(&mut self, list: &mut ResidencyList, page: u64) {
        let _ = list.push_back(PageEntry {
            page,
            frequency: None,
        });
    }
}

//! Most Recently Used (MRU) Replacement Policy.
//!
//! This policy evicts the page that was accessed most recently. It suits cyclic
//! access patterns larger than the resident set, where the page just touched is the
//! one least likely to be needed again soon.

use super::{PolicyKind, ReplacementPolicy};
use crate::cache::{EntryId, PageEntry, ResidencyList};

/// MRU policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MruPolicy;

impl ReplacementPolicy for MruPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Mru
    }

    /// Moves the hit entry to the head, making it the next victim.
    fn on_hit(&mut self, list: &mut ResidencyList, id: EntryId) {
        list.move_to_front(id);
    }

    fn on_miss(&mut self, list: &mut ResidencyList, page: u64) {
        let _ = list.push_front(PageEntry {
            page,
            frequency: None,
        });
    }
}

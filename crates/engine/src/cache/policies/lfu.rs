//! Least Frequently Used (LFU) Replacement Policy.
//!
//! Each entry carries a hit counter. The list stays ordered from the head (lowest
//! frequency) to the tail (highest), so eviction from the head removes the least
//! frequently used page. Missed pages enter at the head with frequency 0.
//!
//! On a hit the frequency is incremented and the entry is re-spliced after every
//! entry with a strictly lower frequency. Among equal frequencies the order is the
//! one misses produce: newer insertions sit nearer the head. Ties are resolved with
//! the list's insertion sequence number rather than by where the scan happens to
//! stop, so equal-frequency entries keep their relative order whichever of them is
//! bumped first.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_hit()`: O(N) scan for the splice point
//!   - `on_miss()`: O(1)

use super::{PolicyKind, ReplacementPolicy};
use crate::cache::{EntryId, PageEntry, ResidencyList};

/// LFU policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LfuPolicy;

impl ReplacementPolicy for LfuPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Lfu
    }

    fn on_hit(&mut self, list: &mut ResidencyList, id: EntryId) {
        let freq = {
            let entry = list.get_mut(id);
            let bumped = entry.frequency.unwrap_or(0).saturating_add(1);
            entry.frequency = Some(bumped);
            bumped
        };
        let seq = list.insertion_seq(id);

        let before = list
            .iter()
            .filter(|&(other, _)| other != id)
            .find(|&(other, e)| {
                let f = e.frequency.unwrap_or(0);
                f > freq || (f == freq && list.insertion_seq(other) < seq)
            })
            .map(|(other, _)| other);
        list.move_before(id, before);
    }

    fn on_miss(&mut self, list: &mut ResidencyList, page: u64) {
        let _ = list.push_front(PageEntry {
            page,
            frequency: Some(0),
        });
    }
}

//! Simulated page residency.
//!
//! This module holds the ordered collection of resident pages that each policy
//! instance maintains. It provides:
//! 1. **Arena storage:** Entries live in a `Vec` and are linked by index, so there are
//!    no raw pointers and a removed entry is handed back by value.
//! 2. **Ordering:** A doubly-linked order from head (next victim) to tail.
//! 3. **Policies:** The per-discipline `on_hit` / `on_miss` rules in [`policies`].
//!
//! # Performance
//!
//! - `find()`: O(N) linear scan from the head; resident sets are expected to stay in
//!   the hundreds to low thousands of entries.
//! - Linking, unlinking and head removal: O(1).
//! - Freed slots are recycled through a free list, so memory tracks the peak size.

/// Replacement policy implementations (FIFO, LRU, MRU, LFU).
pub mod policies;

/// Stable handle to an entry in a [`ResidencyList`].
///
/// Handles stay valid until the entry is removed; they are not reused across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

/// A resident page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEntry {
    /// Opaque page handle.
    pub page: u64,
    /// Access frequency, tracked only by frequency-based policies.
    pub frequency: Option<u64>,
}

#[derive(Debug, Clone)]
struct Slot {
    entry: PageEntry,
    seq: u64,
    prev: Option<usize>,
    next: Option<usize>,
    linked: bool,
}

/// Arena-backed doubly-linked list of resident pages.
///
/// The head is the eviction end for every policy; each policy's insertion and
/// reordering rules decide what ends up there.
#[derive(Debug, Clone, Default)]
pub struct ResidencyList {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    next_seq: u64,
}

impl ResidencyList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resident entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no page is resident.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finds the entry holding `page`, scanning from the head.
    pub fn find(&self, page: u64) -> Option<EntryId> {
        self.iter().find(|(_, e)| e.page == page).map(|(id, _)| id)
    }

    /// Returns the entry behind a handle.
    #[inline]
    pub fn get(&self, id: EntryId) -> &PageEntry {
        &self.slots[id.0].entry
    }

    /// Returns the entry behind a handle, mutably.
    #[inline]
    pub fn get_mut(&mut self, id: EntryId) -> &mut PageEntry {
        &mut self.slots[id.0].entry
    }

    /// Insertion sequence number of an entry; later insertions have larger numbers.
    ///
    /// Used to break ties between entries that a policy otherwise ranks equally.
    #[inline]
    pub fn insertion_seq(&self, id: EntryId) -> u64 {
        self.slots[id.0].seq
    }

    /// Handle of the head (next victim), if any.
    #[inline]
    pub fn head(&self) -> Option<EntryId> {
        self.head.map(EntryId)
    }

    /// Handle of the tail, if any.
    #[inline]
    pub fn tail(&self) -> Option<EntryId> {
        self.tail.map(EntryId)
    }

    /// Iterates entries from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Resident pages from head to tail.
    pub fn pages(&self) -> Vec<u64> {
        self.iter().map(|(_, e)| e.page).collect()
    }

    /// Inserts a new entry at the head.
    pub fn push_front(&mut self, entry: PageEntry) -> EntryId {
        let id = self.alloc(entry);
        self.link_front(id);
        id
    }

    /// Inserts a new entry at the tail.
    pub fn push_back(&mut self, entry: PageEntry) -> EntryId {
        let id = self.alloc(entry);
        self.link_back(id);
        id
    }

    /// Moves a resident entry to the head.
    pub fn move_to_front(&mut self, id: EntryId) {
        if self.head != Some(id.0) {
            self.unlink(id);
            self.link_front(id);
        }
    }

    /// Moves a resident entry to the tail.
    pub fn move_to_back(&mut self, id: EntryId) {
        if self.tail != Some(id.0) {
            self.unlink(id);
            self.link_back(id);
        }
    }

    /// Detaches `id` and re-links it immediately before `before`, or at the tail
    /// when `before` is `None`.
    pub fn move_before(&mut self, id: EntryId, before: Option<EntryId>) {
        if before == Some(id) {
            return;
        }
        self.unlink(id);
        match before {
            None => self.link_back(id),
            Some(at) => {
                let prev = self.slots[at.0].prev;
                {
                    let slot = &mut self.slots[id.0];
                    slot.prev = prev;
                    slot.next = Some(at.0);
                    slot.linked = true;
                }
                self.slots[at.0].prev = Some(id.0);
                match prev {
                    Some(p) => self.slots[p].next = Some(id.0),
                    None => self.head = Some(id.0),
                }
                self.len += 1;
            }
        }
    }

    /// Removes the head entry and returns it.
    pub fn pop_front(&mut self) -> Option<PageEntry> {
        let id = self.head()?;
        Some(self.remove(id))
    }

    /// Removes an entry and returns ownership of it.
    pub fn remove(&mut self, id: EntryId) -> PageEntry {
        self.unlink(id);
        self.free.push(id.0);
        self.slots[id.0].entry
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn alloc(&mut self, entry: PageEntry) -> EntryId {
        let slot = Slot {
            entry,
            seq: self.next_seq,
            prev: None,
            next: None,
            linked: false,
        };
        self.next_seq += 1;
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = slot;
            EntryId(idx)
        } else {
            self.slots.push(slot);
            EntryId(self.slots.len() - 1)
        }
    }

    fn link_front(&mut self, id: EntryId) {
        let old_head = self.head;
        {
            let slot = &mut self.slots[id.0];
            debug_assert!(!slot.linked, "entry linked twice");
            slot.prev = None;
            slot.next = old_head;
            slot.linked = true;
        }
        match old_head {
            Some(h) => self.slots[h].prev = Some(id.0),
            None => self.tail = Some(id.0),
        }
        self.head = Some(id.0);
        self.len += 1;
    }

    fn link_back(&mut self, id: EntryId) {
        let old_tail = self.tail;
        {
            let slot = &mut self.slots[id.0];
            debug_assert!(!slot.linked, "entry linked twice");
            slot.prev = old_tail;
            slot.next = None;
            slot.linked = true;
        }
        match old_tail {
            Some(t) => self.slots[t].next = Some(id.0),
            None => self.head = Some(id.0),
        }
        self.tail = Some(id.0);
        self.len += 1;
    }

    fn unlink(&mut self, id: EntryId) {
        let (prev, next) = {
            let slot = &mut self.slots[id.0];
            debug_assert!(slot.linked, "unlinking a detached entry");
            slot.linked = false;
            (slot.prev.take(), slot.next.take())
        };
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;
    }
}

/// Head-to-tail iterator over a [`ResidencyList`].
#[derive(Debug)]
pub struct Iter<'a> {
    list: &'a ResidencyList,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (EntryId, &'a PageEntry);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let slot = &self.list.slots[idx];
        self.cursor = slot.next;
        Some((EntryId(idx), &slot.entry))
    }
}

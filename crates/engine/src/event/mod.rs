//! Event model.
//!
//! This module defines the normalized representation of one observation made by the
//! kernel instrumentation layer. It provides:
//! 1. **Kinds:** The five page-cache signals ([`EventKind`]) and their wire tags.
//! 2. **Events:** A kind, the originating task and a 64-bit value whose meaning
//!    (page handle or eviction count) is fixed by the kind.
//! 3. **Codecs:** Raw channel record decoding ([`decode`]) and the textual
//!    persisted log ([`log`]).

/// Raw channel record decoding.
pub mod decode;
/// Persisted textual log reader and writer.
pub mod log;

use std::fmt;

use crate::common::{Command, TaskIdentity};

/// Page-cache signal observed by the instrumentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EventKind {
    /// A resident page was accessed (`folio_mark_accessed`).
    AccessHit = 0,
    /// A page was added to the page cache (`filemap_add_folio`).
    CacheMiss = 1,
    /// A mapped page was dirtied by a write (`__folio_mark_dirty`).
    WriteDirtyMark = 2,
    /// A buffer head was dirtied (`mark_buffer_dirty`).
    BufferDirtyMark = 3,
    /// A reclaim pass finished and reports how many pages it freed (`shrink_folio_list`).
    EvictionNotice = 4,
}

impl EventKind {
    /// All kinds in wire-tag order.
    pub const ALL: [Self; 5] = [
        Self::AccessHit,
        Self::CacheMiss,
        Self::WriteDirtyMark,
        Self::BufferDirtyMark,
        Self::EvictionNotice,
    ];

    /// Maps a wire tag to a kind, or `None` if the tag is out of range.
    pub fn from_tag(tag: u32) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Returns the wire tag of this kind.
    #[inline]
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Short mnemonic of the kernel hook behind this kind.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::AccessHit => "FMA",
            Self::CacheMiss => "FAF",
            Self::WriteDirtyMark => "FMD",
            Self::BufferDirtyMark => "MBD",
            Self::EvictionNotice => "SFL",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Interpretation of an event's 64-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// Opaque page identity. Only ever compared for equality.
    Page(u64),
    /// Number of pages a reclaim pass freed.
    Evicted(u64),
}

/// One decoded page-cache observation.
///
/// The meaning of `value` is determined solely by `kind`: it is a page handle for
/// every kind except [`EventKind::EvictionNotice`], where it is an eviction count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Which signal fired.
    pub kind: EventKind,
    /// Task the signal is attributed to.
    pub subject: TaskIdentity,
    /// Page handle or eviction count, depending on `kind`.
    pub value: u64,
}

impl Event {
    /// Creates an event from its parts.
    pub const fn new(kind: EventKind, subject: TaskIdentity, value: u64) -> Self {
        Self {
            kind,
            subject,
            value,
        }
    }

    /// Creates a page access event of the given kind.
    pub const fn page(kind: EventKind, page: u64, subject: TaskIdentity) -> Self {
        Self::new(kind, subject, page)
    }

    /// Creates an eviction notice reporting `count` reclaimed pages.
    pub const fn eviction(count: u64, subject: TaskIdentity) -> Self {
        Self::new(EventKind::EvictionNotice, subject, count)
    }

    /// Returns the value interpreted according to the kind.
    #[inline]
    pub const fn payload(&self) -> Payload {
        match self.kind {
            EventKind::EvictionNotice => Payload::Evicted(self.value),
            _ => Payload::Page(self.value),
        }
    }

    /// Returns `true` for eviction notices.
    #[inline]
    pub fn is_eviction(&self) -> bool {
        self.kind == EventKind::EvictionNotice
    }

    /// Returns the command name of the originating task.
    #[inline]
    pub const fn command(&self) -> &Command {
        &self.subject.command
    }
}

impl fmt::Display for Event {
    /// Formats the event the way `--echo` prints it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UID: {} | PID: {} | COMMAND: {} | TYPE: {} | ",
            self.subject.uid, self.subject.pid, self.subject.command, self.kind
        )?;
        match self.payload() {
            Payload::Page(page) => write!(f, "FOLIO: {page}"),
            Payload::Evicted(count) => write!(f, "NUM_EVICTED: {count}"),
        }
    }
}

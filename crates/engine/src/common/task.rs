//! Task identity types.
//!
//! Every event is attributed to the task that triggered it. The identity is the
//! `(uid, pid, command)` triple reported by the instrumentation layer, but only the
//! `(uid, pid)` pair takes part in aggregation: the command name is kept for display.
//! A pid recycled by the kernel under the same uid therefore aliases onto the earlier
//! task's counters; that limitation is accepted.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};

/// Width of the kernel's task command name (`TASK_COMM_LEN`).
pub const COMMAND_LEN: usize = 16;

/// Raw 16-byte task command name.
///
/// The bytes are stored exactly as received and need not be NUL-terminated.
/// For display the name ends at the first NUL.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Command([u8; COMMAND_LEN]);

impl Command {
    /// Wraps the exact bytes copied out of a raw record.
    pub const fn from_raw(bytes: [u8; COMMAND_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds a command name from text, truncating to 16 bytes and zero-padding the rest.
    pub fn from_name(name: &str) -> Self {
        let mut bytes = [0u8; COMMAND_LEN];
        let src = name.as_bytes();
        let len = src.len().min(COMMAND_LEN);
        bytes[..len].copy_from_slice(&src[..len]);
        Self(bytes)
    }

    /// Returns the raw bytes, including anything after an embedded NUL.
    pub const fn as_bytes(&self) -> &[u8; COMMAND_LEN] {
        &self.0
    }

    /// Returns the bytes before the first NUL, exactly as received.
    pub fn name_bytes(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(COMMAND_LEN);
        &self.0[..end]
    }

    /// Returns the printable part of the name: everything before the first NUL,
    /// with invalid UTF-8 replaced.
    pub fn display_name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name_bytes())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.display_name())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command({:?})", self.display_name())
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display_name())
    }
}

/// Aggregation key: the canonical `(uid, pid)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskKey {
    /// User id of the task.
    pub uid: u32,
    /// Process (thread-group) id of the task.
    pub pid: u32,
}

/// The task an event is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskIdentity {
    /// User id of the task.
    pub uid: u32,
    /// Process (thread-group) id of the task.
    pub pid: u32,
    /// Command name, kept byte-exact.
    pub command: Command,
}

impl TaskIdentity {
    /// Creates a task identity from its three components.
    pub const fn new(uid: u32, pid: u32, command: Command) -> Self {
        Self { uid, pid, command }
    }

    /// Returns the aggregation key for this task.
    #[inline]
    pub const fn key(&self) -> TaskKey {
        TaskKey {
            uid: self.uid,
            pid: self.pid,
        }
    }
}

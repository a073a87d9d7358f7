//! Error definitions for the page-cache simulator.
//!
//! This module defines the single error type shared by every stage of the tool. It covers:
//! 1. **Decode errors:** Raw channel records or log lines that cannot be parsed (recoverable).
//! 2. **Startup errors:** Event channel or persisted log that cannot be opened (fatal).
//! 3. **Output errors:** Failures while appending to the persisted log or printing the report.
//! 4. **Configuration errors:** Unreadable, unparsable or invalid configuration files.
//!
//! An undefined hit rate (zero denominator) is deliberately not an error; it is
//! represented by [`HitRate::NoData`](crate::stats::HitRate::NoData).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while decoding, replaying or recording page-cache events.
#[derive(Debug, Error)]
pub enum SimError {
    /// A raw record or log line could not be decoded.
    ///
    /// Policy: skip the record and keep draining.
    #[error("malformed record: {reason}")]
    MalformedRecord {
        /// Human-readable description of what was wrong with the record.
        reason: String,
    },

    /// The event channel could not be opened or attached.
    #[error("event channel '{}' unavailable: {source}", .path.display())]
    ChannelUnavailable {
        /// Path of the channel that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The event channel failed while it was being read.
    #[error("event channel read failed: {0}")]
    ChannelRead(#[source] io::Error),

    /// The persisted log could not be opened for replay.
    #[error("cannot read log '{}': {source}", .path.display())]
    LogUnreadable {
        /// Path of the log that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// Appending to the persisted log failed.
    #[error("cannot write log: {0}")]
    LogWrite(#[source] io::Error),

    /// Writing the report or echoed events failed.
    #[error("cannot write output: {0}")]
    Output(#[source] io::Error),

    /// The configuration file is missing, unparsable or holds invalid values.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SimError {
    /// Builds a [`SimError::MalformedRecord`] from any displayable reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    /// Returns `true` when the error only affects a single record and draining may continue.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type SimResult<T> = Result<T, SimError>;

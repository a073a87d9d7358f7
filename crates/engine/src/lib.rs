//! Page-cache policy simulation library.
//!
//! This crate replays observed page-cache activity against idealized replacement
//! policies and compares them with the kernel's real behavior:
//! 1. **Events:** Decoding of raw channel records and the persisted text log.
//! 2. **Residency:** An arena-backed ordered list of resident pages per policy.
//! 3. **Policies:** FIFO, LRU, MRU and LFU insertion and reordering rules.
//! 4. **Statistics:** Per-task aggregation, the reconciled real hit rate and the
//!    comparative report.
//! 5. **Simulation:** Fan-out of each event to every policy, synthetic eviction,
//!    and the cooperative drain loop over the event channel.

/// Residency list and replacement policies.
pub mod cache;
/// Common types (errors, task identity).
pub mod common;
/// Simulator configuration (defaults, sections, JSON loading).
pub mod config;
/// Event model, raw record decoding and persisted log.
pub mod event;
/// Policy instances, the simulator and event sources.
pub mod sim;
/// Hit/miss statistics, real-behavior accounting and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load it from JSON.
pub use crate::config::Config;
/// Crate-wide error type and result alias.
pub use crate::common::{SimError, SimResult};
/// Decoded page-cache event.
pub use crate::event::{Event, EventKind};
/// The policy set simulated side by side.
pub use crate::cache::policies::PolicyKind;
/// Top-level simulation state; construct with `Simulation::new`.
pub use crate::sim::Simulation;

//! Common types shared across the simulator.
//!
//! 1. **Errors:** The crate-wide [`SimError`] and [`SimResult`].
//! 2. **Task identity:** Command names and the `(uid, pid)` aggregation key.

/// Error type and result alias.
pub mod error;
/// Task identity, command name and aggregation key.
pub mod task;

pub use error::{SimError, SimResult};
pub use task::{COMMAND_LEN, Command, TaskIdentity, TaskKey};

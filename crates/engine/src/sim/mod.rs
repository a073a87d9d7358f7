//! Simulation driver.
//!
//! 1. **Instances:** [`PolicyInstance`], one replacement policy with its own state.
//! 2. **Simulator:** [`Simulation`], all policies plus the real-behavior accountant.
//! 3. **Sources:** The event channel boundary and the cooperative drain loop.

/// Single-policy instance.
pub mod instance;
/// Fan-out of events to all instances.
pub mod simulator;
/// Event sources and the drain loop.
pub mod source;

pub use instance::{Access, PolicyInstance, Summary};
pub use simulator::Simulation;
pub use source::{ChannelSource, DrainStats, EventSource, Poll, RecordStream, drain};

//! Simulator: the four policy instances and the real-behavior accountant side by side.
//!
//! Each event is fanned out synchronously to every instance and to the accountant
//! before the next one is accepted, so no state is ever observed half-updated.
//! All state is owned by the [`Simulation`] value; independent runs share nothing.

use tracing::debug;

use super::instance::PolicyInstance;
use crate::cache::policies::PolicyKind;
use crate::config::{Config, EvictionConfig};
use crate::event::Event;
use crate::stats::report::PolicyColumn;
use crate::stats::{RealAccountant, Report};

/// Top-level simulation state.
#[derive(Debug)]
pub struct Simulation {
    policies: Vec<PolicyInstance>,
    real: RealAccountant,
    eviction: EvictionConfig,
    processed: u64,
    synthetic_evictions: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Simulation {
    /// Creates a fresh simulation with one instance per policy.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the per-policy capacity and synthetic eviction settings.
    pub fn new(config: &Config) -> Self {
        Self {
            policies: PolicyKind::ALL
                .iter()
                .map(|&kind| PolicyInstance::with_capacity(kind, config.capacity))
                .collect(),
            real: RealAccountant::new(),
            eviction: config.eviction.clone(),
            processed: 0,
            synthetic_evictions: 0,
        }
    }

    /// Applies one event to every policy instance and the accountant.
    ///
    /// When synthetic eviction is enabled, every `interval`-th event is followed by
    /// an eviction of `count` pages in each instance.
    pub fn process(&mut self, event: &Event) {
        for policy in &mut self.policies {
            let _ = policy.track_access(event);
        }
        self.real.record(event);
        self.processed += 1;

        if self.eviction.enabled() && self.processed % self.eviction.interval == 0 {
            self.inject_eviction();
        }
    }

    fn inject_eviction(&mut self) {
        let n = usize::try_from(self.eviction.count).unwrap_or(usize::MAX);
        for policy in &mut self.policies {
            let _ = policy.evict(n);
        }
        self.synthetic_evictions += 1;
        debug!(
            processed = self.processed,
            count = n,
            "synthetic eviction injected"
        );
    }

    /// Replays a whole sequence of events.
    pub fn replay<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) {
        for event in events {
            self.process(event);
        }
    }

    /// Number of events processed so far.
    pub const fn processed(&self) -> u64 {
        self.processed
    }

    /// Number of synthetic evictions injected so far.
    pub const fn synthetic_evictions(&self) -> u64 {
        self.synthetic_evictions
    }

    /// All policy instances, in [`PolicyKind::ALL`] order.
    pub fn policies(&self) -> &[PolicyInstance] {
        &self.policies
    }

    /// The instance simulating `kind`.
    pub fn policy(&self, kind: PolicyKind) -> Option<&PolicyInstance> {
        self.policies.iter().find(|p| p.kind() == kind)
    }

    /// The real-behavior accountant.
    pub const fn real(&self) -> &RealAccountant {
        &self.real
    }

    /// Emits each instance's size and counters at debug level.
    pub fn log_summaries(&self) {
        for policy in &self.policies {
            debug!("{}", policy.summary());
        }
    }

    /// Builds the comparative report from the current state.
    pub fn report(&self) -> Report {
        let columns: Vec<PolicyColumn<'_>> = self
            .policies
            .iter()
            .map(|p| PolicyColumn {
                kind: p.kind(),
                tasks: p.tasks(),
                totals: p.totals(),
            })
            .collect();
        Report::build(&self.real, &columns)
    }
}

use pagesim_core::config::Config;
use pagesim_core::event::Event;
use pagesim_core::{PolicyKind, Simulation};
use pagesim_core::sim::PolicyInstance;

/// A simulation with test logging wired to the libtest capture.
pub struct TestContext {
    pub sim: Simulation,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("pagesim_core=debug")
            .with_test_writer()
            .try_init();
        Self {
            sim: Simulation::new(config),
        }
    }

    /// Processes every event in order.
    pub fn feed(&mut self, events: &[Event]) {
        self.sim.replay(events);
    }

    /// The instance simulating `kind`.
    pub fn policy(&self, kind: PolicyKind) -> &PolicyInstance {
        self.sim
            .policy(kind)
            .unwrap_or_else(|| panic!("no {kind} instance"))
    }

    /// Resident pages of `kind`, sorted, for order-insensitive comparisons.
    pub fn resident_sorted(&self, kind: PolicyKind) -> Vec<u64> {
        let mut pages = self.policy(kind).residency().pages();
        pages.sort_unstable();
        pages
    }
}

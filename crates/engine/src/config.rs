//! Configuration system for the page-cache simulator.
//!
//! This module defines every knob of a simulation or recording run. It provides:
//! 1. **Defaults:** Baseline constants (poll timeout, record size, eviction batch).
//! 2. **Structures:** General, eviction, channel and report sections.
//! 3. **Loading:** JSON files via `serde_json`, followed by validation.
//!
//! Every field has a default, so `{}` is a complete configuration and CLI flags
//! only need to override what they change.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::{SimError, SimResult};
use crate::event::decode::{HEADER_LEN, RECORD_SIZE};

/// Default configuration constants.
mod defaults {
    /// Channel poll timeout in milliseconds.
    pub const POLL_TIMEOUT_MS: u64 = 100;

    /// Pages removed by each synthetic eviction.
    pub const EVICTION_COUNT: u64 = 16;
}

/// Output form of the comparative report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ReportFormat {
    /// Fixed-width text table.
    #[default]
    Table,
    /// Pretty-printed JSON.
    #[serde(alias = "JSON")]
    Json,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use pagesim_core::config::{Config, ReportFormat};
///
/// let json = r#"{
///     "general": { "echo_events": true },
///     "eviction": { "interval": 1000, "count": 32 },
///     "capacity": 4096,
///     "report": { "format": "Json" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.echo_events);
/// assert_eq!(config.eviction.interval, 1000);
/// assert_eq!(config.capacity, Some(4096));
/// assert_eq!(config.channel.poll_timeout_ms, 100);
/// assert_eq!(config.report.format, ReportFormat::Json);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Output and echo settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Synthetic eviction injection.
    #[serde(default)]
    pub eviction: EvictionConfig,
    /// Simulated capacity per policy; unbounded when absent.
    #[serde(default)]
    pub capacity: Option<usize>,
    /// Event channel settings.
    #[serde(default)]
    pub channel: ChannelConfig,
    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Print every processed event to stdout.
    #[serde(default)]
    pub echo_events: bool,
    /// Print a running "Events Logged" counter while recording.
    #[serde(default)]
    pub progress: bool,
}

/// Synthetic eviction settings, for event streams without real eviction notices.
#[derive(Debug, Clone, Deserialize)]
pub struct EvictionConfig {
    /// Inject an eviction every `interval` processed events; 0 disables injection.
    #[serde(default)]
    pub interval: u64,
    /// Pages removed by each injected eviction.
    #[serde(default = "EvictionConfig::default_count")]
    pub count: u64,
}

impl EvictionConfig {
    fn default_count() -> u64 {
        defaults::EVICTION_COUNT
    }

    /// Returns `true` when synthetic eviction is enabled.
    pub const fn enabled(&self) -> bool {
        self.interval > 0
    }
}

impl Default for EvictionConfig {
    fn default() -> Self {
        Self {
            interval: 0,
            count: defaults::EVICTION_COUNT,
        }
    }
}

/// Event channel settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Bounded wait per poll, in milliseconds.
    #[serde(default = "ChannelConfig::default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    /// Size of one raw record reservation, padding included.
    #[serde(default = "ChannelConfig::default_record_size")]
    pub record_size: usize,
}

impl ChannelConfig {
    fn default_poll_timeout_ms() -> u64 {
        defaults::POLL_TIMEOUT_MS
    }

    fn default_record_size() -> usize {
        RECORD_SIZE
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: defaults::POLL_TIMEOUT_MS,
            record_size: RECORD_SIZE,
        }
    }
}

/// Report settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Output form.
    #[serde(default)]
    pub format: ReportFormat,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the text is not valid JSON for this
    /// structure or a value fails validation.
    pub fn from_json(text: &str) -> SimResult<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Checks value ranges that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] describing the first invalid value.
    pub fn validate(&self) -> SimResult<()> {
        if self.capacity == Some(0) {
            return Err(SimError::Config("capacity must be at least 1".into()));
        }
        if self.eviction.enabled() && self.eviction.count == 0 {
            return Err(SimError::Config(
                "eviction.count must be at least 1 when eviction.interval is set".into(),
            ));
        }
        if self.channel.record_size < HEADER_LEN {
            return Err(SimError::Config(format!(
                "channel.record_size must be at least {HEADER_LEN} bytes"
            )));
        }
        if self.channel.poll_timeout_ms == 0 {
            return Err(SimError::Config(
                "channel.poll_timeout_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

//! Configuration for the monitor component

use crate::{MonitorError, Result};
use resource_tracker::TrackerConfig;
use resource_types::ExclusionRules;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the monitor component
///
/// Durations are stored as milliseconds so the struct serializes to plain
/// numbers; use the `Duration` accessors when wiring tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Most records the log keeps before evicting the oldest
    max_log_entries: usize,

    /// Age after which an unanswered request start is forgotten
    pending_timeout_ms: u64,

    /// Cadence of the pending-request sweep
    sweep_interval_ms: u64,

    /// How long a popup waits for the tracker to answer
    request_timeout_ms: u64,

    /// Bounded capacity of the request queue
    channel_capacity: usize,

    /// Base URL the host assigned to this extension, if known
    extension_base_url: Option<String>,
}

impl MonitorConfig {
    /// Create a new builder for MonitorConfig
    ///
    /// # Example
    ///
    /// ```
    /// use monitor_component::MonitorConfig;
    ///
    /// let config = MonitorConfig::builder()
    ///     .max_log_entries(500)
    ///     .request_timeout_ms(2000)
    ///     .build();
    /// assert_eq!(config.max_log_entries(), 500);
    /// ```
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }

    pub fn max_log_entries(&self) -> usize {
        self.max_log_entries
    }

    pub fn pending_timeout(&self) -> Duration {
        Duration::from_millis(self.pending_timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    pub fn extension_base_url(&self) -> Option<&str> {
        self.extension_base_url.as_deref()
    }

    /// Self-instrumentation rules shared by the tracker and popup engines
    pub fn exclusion_rules(&self) -> ExclusionRules {
        match &self.extension_base_url {
            Some(base) => ExclusionRules::with_base_url(base.clone()),
            None => ExclusionRules::default(),
        }
    }

    /// Tracker-level settings derived from this configuration
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig::default()
            .with_max_entries(self.max_log_entries)
            .with_pending_timeout(self.pending_timeout())
            .with_sweep_interval(self.sweep_interval())
            .with_exclusion(self.exclusion_rules())
    }

    /// Reject values that would stall or disable the monitor
    pub fn validate(&self) -> Result<()> {
        if self.max_log_entries == 0 {
            return Err(MonitorError::InvalidConfiguration(
                "max_log_entries must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval_ms == 0 {
            return Err(MonitorError::InvalidConfiguration(
                "sweep_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.pending_timeout_ms == 0 || self.request_timeout_ms == 0 {
            return Err(MonitorError::InvalidConfiguration(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(MonitorError::InvalidConfiguration(
                "channel_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    /// Default values:
    /// - max_log_entries: 1000
    /// - pending_timeout_ms: 5 minutes
    /// - sweep_interval_ms: 1 minute
    /// - request_timeout_ms: 5 seconds
    /// - channel_capacity: 32
    /// - extension_base_url: none
    fn default() -> Self {
        Self {
            max_log_entries: 1000,
            pending_timeout_ms: 5 * 60 * 1000,
            sweep_interval_ms: 60 * 1000,
            request_timeout_ms: 5000,
            channel_capacity: 32,
            extension_base_url: None,
        }
    }
}

/// Builder for MonitorConfig
#[derive(Debug, Clone, Default)]
pub struct MonitorConfigBuilder {
    max_log_entries: Option<usize>,
    pending_timeout_ms: Option<u64>,
    sweep_interval_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    channel_capacity: Option<usize>,
    extension_base_url: Option<String>,
}

impl MonitorConfigBuilder {
    pub fn max_log_entries(mut self, entries: usize) -> Self {
        self.max_log_entries = Some(entries);
        self
    }

    pub fn pending_timeout_ms(mut self, millis: u64) -> Self {
        self.pending_timeout_ms = Some(millis);
        self
    }

    pub fn sweep_interval_ms(mut self, millis: u64) -> Self {
        self.sweep_interval_ms = Some(millis);
        self
    }

    pub fn request_timeout_ms(mut self, millis: u64) -> Self {
        self.request_timeout_ms = Some(millis);
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = Some(capacity);
        self
    }

    /// Set the extension's own base URL (e.g. `moz-extension://<uuid>/`)
    pub fn extension_base_url(mut self, url: impl Into<String>) -> Self {
        self.extension_base_url = Some(url.into());
        self
    }

    /// Build the MonitorConfig
    ///
    /// Uses default values for any options not explicitly set. Validation
    /// happens when the component is created.
    pub fn build(self) -> MonitorConfig {
        let default = MonitorConfig::default();

        MonitorConfig {
            max_log_entries: self.max_log_entries.unwrap_or(default.max_log_entries),
            pending_timeout_ms: self
                .pending_timeout_ms
                .unwrap_or(default.pending_timeout_ms),
            sweep_interval_ms: self.sweep_interval_ms.unwrap_or(default.sweep_interval_ms),
            request_timeout_ms: self
                .request_timeout_ms
                .unwrap_or(default.request_timeout_ms),
            channel_capacity: self.channel_capacity.unwrap_or(default.channel_capacity),
            extension_base_url: self.extension_base_url.or(default.extension_base_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();

        assert_eq!(config.max_log_entries(), 1000);
        assert_eq!(config.pending_timeout(), Duration::from_secs(300));
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.channel_capacity(), 32);
        assert!(config.extension_base_url().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_all_options() {
        let config = MonitorConfig::builder()
            .max_log_entries(10)
            .pending_timeout_ms(1000)
            .sweep_interval_ms(100)
            .request_timeout_ms(50)
            .channel_capacity(4)
            .extension_base_url("moz-extension://abc/")
            .build();

        assert_eq!(config.max_log_entries(), 10);
        assert_eq!(config.pending_timeout(), Duration::from_millis(1000));
        assert_eq!(config.sweep_interval(), Duration::from_millis(100));
        assert_eq!(config.request_timeout(), Duration::from_millis(50));
        assert_eq!(config.channel_capacity(), 4);
        assert_eq!(config.extension_base_url(), Some("moz-extension://abc/"));
    }

    #[test]
    fn test_builder_partial_uses_defaults() {
        let config = MonitorConfig::builder().channel_capacity(8).build();
        let default = MonitorConfig::default();

        assert_eq!(config.channel_capacity(), 8);
        assert_eq!(config.max_log_entries(), default.max_log_entries());
        assert_eq!(config.request_timeout(), default.request_timeout());
    }

    #[test]
    fn test_tracker_config_mirrors_settings() {
        let config = MonitorConfig::builder()
            .max_log_entries(25)
            .pending_timeout_ms(2000)
            .sweep_interval_ms(500)
            .extension_base_url("chrome-extension://xyz/")
            .build();

        let tracker = config.tracker_config();
        assert_eq!(tracker.max_entries, 25);
        assert_eq!(tracker.pending_timeout, Duration::from_millis(2000));
        assert_eq!(tracker.sweep_interval, Duration::from_millis(500));
        assert_eq!(
            tracker.exclusion.extension_base_url.as_deref(),
            Some("chrome-extension://xyz/")
        );
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let cases = [
            MonitorConfig::builder().max_log_entries(0).build(),
            MonitorConfig::builder().sweep_interval_ms(0).build(),
            MonitorConfig::builder().pending_timeout_ms(0).build(),
            MonitorConfig::builder().request_timeout_ms(0).build(),
            MonitorConfig::builder().channel_capacity(0).build(),
        ];

        for config in cases {
            assert!(matches!(
                config.validate(),
                Err(MonitorError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let config = MonitorConfig::builder().max_log_entries(7).build();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"max_log_entries\":7"));

        let parsed: MonitorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}

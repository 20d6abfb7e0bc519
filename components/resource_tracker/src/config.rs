//! Tracker configuration

use resource_types::ExclusionRules;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cap on the number of logged records
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Default age after which an unfinished request is forgotten
pub const DEFAULT_PENDING_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Default period of the pending-request sweep
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the resource tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Maximum number of records kept in the log (oldest evicted first)
    pub max_entries: usize,

    /// Pending requests older than this are dropped by the sweep
    pub pending_timeout: Duration,

    /// How often the sweep runs
    pub sweep_interval: Duration,

    /// Self-instrumentation guard
    pub exclusion: ExclusionRules,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            pending_timeout: DEFAULT_PENDING_TIMEOUT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            exclusion: ExclusionRules::default(),
        }
    }
}

impl TrackerConfig {
    /// Set the log cap
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the pending-request timeout
    pub fn with_pending_timeout(mut self, timeout: Duration) -> Self {
        self.pending_timeout = timeout;
        self
    }

    /// Set the sweep period; zero means [`DEFAULT_SWEEP_INTERVAL`]
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Sweep period the timer task actually uses
    ///
    /// A timer cannot tick with a zero period, so zero falls back to
    /// [`DEFAULT_SWEEP_INTERVAL`].
    pub fn effective_sweep_interval(&self) -> Duration {
        if self.sweep_interval.is_zero() {
            DEFAULT_SWEEP_INTERVAL
        } else {
            self.sweep_interval
        }
    }

    /// Set the exclusion rules
    pub fn with_exclusion(mut self, exclusion: ExclusionRules) -> Self {
        self.exclusion = exclusion;
        self
    }
}

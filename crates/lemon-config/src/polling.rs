//! Polling cadence.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_slow_ms() -> u64 {
    5_000
}

const fn default_fast_ms() -> u64 {
    2_000
}

const fn default_list_ms() -> u64 {
    10_000
}

const fn default_credits_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Interval while a report's state is not yet known.
    #[serde(default = "default_slow_ms")]
    pub slow_interval_ms: u64,

    /// Interval while a report is actively processing.
    #[serde(default = "default_fast_ms")]
    pub fast_interval_ms: u64,

    /// Interval for refreshing the report list in watch mode.
    #[serde(default = "default_list_ms")]
    pub list_interval_ms: u64,

    /// Interval for refreshing the credit balance.
    #[serde(default = "default_credits_ms")]
    pub credits_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            slow_interval_ms: default_slow_ms(),
            fast_interval_ms: default_fast_ms(),
            list_interval_ms: default_list_ms(),
            credits_interval_ms: default_credits_ms(),
        }
    }
}

impl PollingConfig {
    #[must_use]
    pub const fn slow(&self) -> Duration {
        Duration::from_millis(self.slow_interval_ms)
    }

    #[must_use]
    pub const fn fast(&self) -> Duration {
        Duration::from_millis(self.fast_interval_ms)
    }

    #[must_use]
    pub const fn list(&self) -> Duration {
        Duration::from_millis(self.list_interval_ms)
    }

    #[must_use]
    pub const fn credits(&self) -> Duration {
        Duration::from_millis(self.credits_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_tier_is_faster_than_slow_tier() {
        let config = PollingConfig::default();
        assert!(config.fast() < config.slow());
        assert_eq!(config.slow(), Duration::from_secs(5));
        assert_eq!(config.fast(), Duration::from_secs(2));
    }
}

//! # lemon-config
//!
//! Layered configuration loading for the LemonLens client using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LEMONLENS_*` prefix, `__` as separator)
//! 2. Project-level `.lemonlens/config.toml`
//! 3. User-level `~/.config/lemonlens/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `LEMONLENS_API__BASE_URL` -> `api.base_url`, `LEMONLENS_POLLING__FAST_INTERVAL_MS`
//! -> `polling.fast_interval_ms`, and so on.
//!
//! # Usage
//!
//! ```no_run
//! use lemon_config::LemonConfig;
//!
//! let config = LemonConfig::load_with_dotenv().expect("config");
//! println!("API: {}", config.api.base_url);
//! ```

mod api;
mod error;
mod google;
mod polling;
mod session;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use google::GoogleConfig;
pub use polling::PollingConfig;
pub use session::SessionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "LEMONLENS_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LemonConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub google: GoogleConfig,
}

impl LemonConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or the merged
    /// configuration fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or stack extra providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".lemonlens/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that would make the client unusable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a bad base URL, a zero TTL,
    /// or zero/inverted polling intervals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.normalized_base_url()?;
        if self.session.ttl_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.ttl_hours",
                reason: "must be at least 1".into(),
            });
        }
        if self.polling.fast_interval_ms == 0 || self.polling.slow_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling",
                reason: "intervals must be non-zero".into(),
            });
        }
        if self.polling.fast_interval_ms > self.polling.slow_interval_ms {
            return Err(ConfigError::InvalidValue {
                field: "polling.fast_interval_ms",
                reason: "fast interval must not exceed the slow interval".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lemonlens").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LemonConfig::default();
        config.validate().expect("defaults validate");
        assert!(!config.google.is_configured());
        assert_eq!(config.session.ttl_hours, 24);
    }

    #[test]
    fn inverted_polling_tiers_rejected() {
        let mut config = LemonConfig::default();
        config.polling.fast_interval_ms = 10_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn zero_ttl_rejected() {
        let mut config = LemonConfig::default();
        config.session.ttl_hours = 0;
        assert!(config.validate().is_err());
    }
}

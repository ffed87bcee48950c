//! Google sign-in configuration.

use serde::{Deserialize, Serialize};

const fn default_consent_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleConfig {
    /// OAuth client ID used for the browser consent flow.
    #[serde(default)]
    pub client_id: String,

    /// How long to wait for the browser callback before giving up.
    #[serde(default = "default_consent_timeout_secs")]
    pub consent_timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            consent_timeout_secs: default_consent_timeout_secs(),
        }
    }
}

impl GoogleConfig {
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty()
    }
}

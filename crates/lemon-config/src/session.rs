//! Anonymous session and local state settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const fn default_ttl_hours() -> u32 {
    24
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Lifetime of an issued anonymous session.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u32,

    /// Directory holding client state. Empty means `~/.lemonlens`.
    #[serde(default)]
    pub state_dir: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            state_dir: String::new(),
        }
    }
}

impl SessionConfig {
    /// Resolved state directory, `None` if no home directory is available.
    #[must_use]
    pub fn resolved_state_dir(&self) -> Option<PathBuf> {
        if self.state_dir.is_empty() {
            dirs::home_dir().map(|home| home.join(".lemonlens"))
        } else {
            Some(PathBuf::from(&self.state_dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_a_day() {
        assert_eq!(SessionConfig::default().ttl_hours, 24);
    }

    #[test]
    fn explicit_state_dir_wins() {
        let config = SessionConfig {
            state_dir: "/tmp/lemon".into(),
            ..Default::default()
        };
        assert_eq!(config.resolved_state_dir(), Some(PathBuf::from("/tmp/lemon")));
    }
}

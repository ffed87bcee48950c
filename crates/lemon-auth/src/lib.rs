//! # lemon-auth
//!
//! Identity for the LemonLens client.
//!
//! Provides the anonymous session store (24 h ids issued by the server), the
//! [`AuthManager`] that owns login/logout transitions, durable state
//! (`state.json` plus an OS keychain token via `keyring`), and the Google
//! browser consent flow (`tiny_http` + `open`).

pub mod browser_flow;
pub mod error;
pub mod manager;
pub mod session;
pub mod storage;
pub mod token_store;

use std::sync::Arc;

use chrono::TimeDelta;
use lemon_api::{AuthApi, SessionApi};
use lemon_config::SessionConfig;
use lemon_core::Clock;

pub use browser_flow::{ConsentFlow, GoogleConsent};
pub use error::AuthError;
pub use manager::{AuthManager, Registration};
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage, Storage, StoredState};
pub use token_store::TokenStore;

/// Build an [`AuthManager`] over the configured state directory.
///
/// # Errors
///
/// Returns `AuthError::Storage` if no state directory can be resolved or the
/// persisted state cannot be read.
pub fn from_config<A: SessionApi + AuthApi + 'static>(
    api: Arc<A>,
    config: &SessionConfig,
    clock: Arc<dyn Clock>,
) -> Result<AuthManager<A>, AuthError> {
    let dir = config.resolved_state_dir().ok_or_else(|| {
        AuthError::Storage("home directory not found; set session.state_dir".into())
    })?;
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&dir));
    AuthManager::new(api, storage, clock, TimeDelta::hours(i64::from(config.ttl_hours)))
}

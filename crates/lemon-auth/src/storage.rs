//! Durable client state.
//!
//! The persisted document keeps the key names the web client used
//! (`sessionId`, `sessionExpiry` in epoch milliseconds, `user`) so a state
//! file can be inspected or seeded by hand.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use lemon_core::{AnonymousSession, AuthenticatedUser};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::token_store::{TokenStore, write_private};

const STATE_FILE_NAME: &str = "state.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_expiry: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthenticatedUser>,
}

impl StoredState {
    /// The persisted session, expired or not. `None` if either key is missing.
    #[must_use]
    pub fn session(&self) -> Option<AnonymousSession> {
        let session_id = self.session_id.clone().filter(|id| !id.is_empty())?;
        let expires_at = DateTime::<Utc>::from_timestamp_millis(self.session_expiry?)?;
        Some(AnonymousSession {
            session_id,
            expires_at,
        })
    }

    pub fn set_session(&mut self, session: &AnonymousSession) {
        self.session_id = Some(session.session_id.clone());
        self.session_expiry = Some(session.expires_at.timestamp_millis());
    }

    pub fn clear_session(&mut self) {
        self.session_id = None;
        self.session_expiry = None;
    }
}

/// Read-modify-write access to [`StoredState`].
///
/// `update` is atomic with respect to other calls on the same storage.
pub trait Storage: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the state cannot be read.
    fn load(&self) -> Result<StoredState, AuthError>;

    /// Apply `edit` and persist the result, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the state cannot be read or written.
    fn update(
        &self,
        edit: &mut dyn FnMut(&mut StoredState),
    ) -> Result<StoredState, AuthError>;
}

/// In-process storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<StoredState>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new(initial: StoredState) -> Self {
        Self {
            state: Mutex::new(initial),
        }
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<StoredState, AuthError> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn update(
        &self,
        edit: &mut dyn FnMut(&mut StoredState),
    ) -> Result<StoredState, AuthError> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        edit(&mut state);
        Ok(state.clone())
    }
}

/// `state.json` inside the state directory, with the bearer token split out
/// into a [`TokenStore`].
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    tokens: TokenStore,
    lock: Mutex<()>,
}

impl FileStorage {
    /// File state with the token in the OS keychain (file fallback).
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        Self::with_tokens(state_dir, TokenStore::keyring(state_dir))
    }

    /// File state with the token in a `credentials` file beside it.
    #[must_use]
    pub fn without_keyring(state_dir: &Path) -> Self {
        Self::with_tokens(state_dir, TokenStore::file_only(state_dir))
    }

    fn with_tokens(state_dir: &Path, tokens: TokenStore) -> Self {
        Self {
            path: state_dir.join(STATE_FILE_NAME),
            tokens,
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    fn read(&self) -> Result<StoredState, AuthError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoredState::default()),
            Err(e) => {
                return Err(AuthError::Storage(format!(
                    "read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let mut state: StoredState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "unreadable state file; starting fresh");
                StoredState::default()
            }
        };

        if let Some(user) = state.user.as_mut()
            && user.auth_token.is_empty()
        {
            match self.tokens.load() {
                Some(token) => user.auth_token = token,
                None => {
                    tracing::warn!(user_id = %user.user_id, "stored user has no token; treating as logged out");
                    state.user = None;
                }
            }
        }
        Ok(state)
    }

    fn write(&self, before: &StoredState, state: &StoredState) -> Result<(), AuthError> {
        let old_token = before.user.as_ref().map(|u| u.auth_token.as_str());
        let mut on_disk = state.clone();
        match on_disk.user.as_mut() {
            Some(user) => {
                if old_token != Some(user.auth_token.as_str()) {
                    self.tokens.store(&user.auth_token)?;
                }
                user.auth_token.clear();
            }
            None if old_token.is_some() => self.tokens.delete()?,
            None => {}
        }
        let json = serde_json::to_string_pretty(&on_disk)
            .map_err(|e| AuthError::Storage(format!("serialize state: {e}")))?;
        write_private(&self.path, &json)
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<StoredState, AuthError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.read()
    }

    fn update(
        &self,
        edit: &mut dyn FnMut(&mut StoredState),
    ) -> Result<StoredState, AuthError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut state = self.read()?;
        let before = state.clone();
        edit(&mut state);
        if state != before {
            self.write(&before, &state)?;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "7".into(),
            display_name: "Dana".into(),
            email: "dana@example.com".into(),
            auth_token: "secret-token".into(),
            credits: 2,
        }
    }

    #[test]
    fn session_keys_round_trip_as_epoch_millis() {
        let expires_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut state = StoredState::default();
        state.set_session(&AnonymousSession {
            session_id: "abc".into(),
            expires_at,
        });

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"sessionId": "abc", "sessionExpiry": expires_at.timestamp_millis()})
        );
        assert_eq!(state.session().unwrap().expires_at, expires_at);

        state.clear_session();
        assert!(state.session().is_none());
    }

    #[test]
    fn file_storage_keeps_token_out_of_state_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = FileStorage::without_keyring(tmp.path());

        storage
            .update(&mut |s| s.user = Some(user()))
            .expect("update");

        let raw = std::fs::read_to_string(storage.path()).unwrap();
        assert!(!raw.contains("secret-token"));
        assert_eq!(storage.load().unwrap().user, Some(user()));

        storage.update(&mut |s| s.user = None).expect("logout");
        assert!(storage.tokens().load().is_none());
    }

    #[test]
    fn missing_token_drops_user() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = FileStorage::without_keyring(tmp.path());
        std::fs::write(
            storage.path(),
            r#"{"user":{"user_id":"7","display_name":"Dana","email":"d@x.io","auth_token":""}}"#,
        )
        .unwrap();
        assert_eq!(storage.load().unwrap().user, None);
    }

    #[test]
    fn corrupt_state_file_starts_fresh() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = FileStorage::without_keyring(tmp.path());
        std::fs::write(storage.path(), "{not json").unwrap();
        assert_eq!(storage.load().unwrap(), StoredState::default());
    }
}

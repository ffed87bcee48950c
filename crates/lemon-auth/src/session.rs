//! Anonymous session identity.
//!
//! A session id is reused while `expires_at > now` and replaced once it
//! lapses. Issuance goes through one async gate, so concurrent callers share
//! the first caller's result instead of each asking the server for an id.

use std::sync::Arc;

use chrono::TimeDelta;
use lemon_api::SessionApi;
use lemon_core::{AnonymousSession, Clock};
use tokio::sync::Mutex;

use crate::error::AuthError;
use crate::storage::Storage;

pub struct SessionStore<A> {
    api: Arc<A>,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    gate: Mutex<()>,
}

impl<A: SessionApi> SessionStore<A> {
    pub fn new(api: Arc<A>, storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            api,
            storage,
            clock,
            ttl,
            gate: Mutex::new(()),
        }
    }

    /// The persisted session if it is still valid. Never touches the network.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the state cannot be read.
    pub fn current(&self) -> Result<Option<AnonymousSession>, AuthError> {
        let now = self.clock.now();
        Ok(self
            .storage
            .load()?
            .session()
            .filter(|session| session.is_valid_at(now)))
    }

    /// Reuse the persisted session or obtain a new one from the server.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionUnavailable` if issuance fails; nothing is
    /// persisted in that case, so calling again is safe.
    pub async fn get_or_create_session(&self) -> Result<AnonymousSession, AuthError> {
        let _gate = self.gate.lock().await;
        if let Some(session) = self.current()? {
            return Ok(session);
        }
        self.issue().await
    }

    /// Drop the current session and obtain a fresh one, distinct from it.
    ///
    /// # Errors
    ///
    /// See [`Self::get_or_create_session`].
    pub async fn renew(&self) -> Result<AnonymousSession, AuthError> {
        let _gate = self.gate.lock().await;
        self.storage.update(&mut |state| state.clear_session())?;
        self.issue().await
    }

    /// Forget the session in storage.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the state cannot be written.
    pub fn clear(&self) -> Result<(), AuthError> {
        self.storage.update(&mut |state| state.clear_session())?;
        Ok(())
    }

    async fn issue(&self) -> Result<AnonymousSession, AuthError> {
        let session_id = match self.api.issue_session().await {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!(%error, "session issuance failed; anonymous reports disabled until retry");
                return Err(AuthError::SessionUnavailable(error));
            }
        };
        let session = AnonymousSession {
            session_id,
            expires_at: self.clock.now() + self.ttl,
        };
        self.storage.update(&mut |state| state.set_session(&session))?;
        tracing::debug!(session_id = %session.session_id, expires_at = %session.expires_at, "issued anonymous session");
        Ok(session)
    }
}

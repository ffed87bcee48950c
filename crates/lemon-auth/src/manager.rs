//! The single owner of "who is the current actor".
//!
//! ```text
//! LoggedOut(session) ──login | register | google──▶ LoggedIn(user)
//!        ▲                                              │
//!        └───────────── logout (new session) ◀──────────┘
//! ```
//!
//! Every transition is persisted first and then published on a
//! [`tokio::sync::watch`] channel; report caches subscribe and drop entries
//! that belong to a different scope.

use std::sync::{Arc, PoisonError};

use chrono::TimeDelta;
use lemon_api::{
    AuthApi, AuthResponse, GoogleLoginRequest, LoginRequest, RegisterRequest, SessionApi,
};
use lemon_core::{AnonymousSession, AuthenticatedUser, Clock, Identity};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::browser_flow::ConsentFlow;
use crate::error::AuthError;
use crate::session::SessionStore;
use crate::storage::Storage;

/// Registration form values.
#[derive(Debug, Clone)]
pub struct Registration {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

pub struct AuthManager<A> {
    api: Arc<A>,
    sessions: SessionStore<A>,
    storage: Arc<dyn Storage>,
    identity: watch::Sender<Identity>,
    transitions: Mutex<()>,
    remote_logout: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl<A: SessionApi + AuthApi + 'static> AuthManager<A> {
    /// Build the manager and restore the persisted identity without touching
    /// the network. Call [`Self::bootstrap`] to obtain a session if needed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the persisted state cannot be read.
    pub fn new(
        api: Arc<A>,
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        session_ttl: TimeDelta,
    ) -> Result<Self, AuthError> {
        let sessions = SessionStore::new(Arc::clone(&api), Arc::clone(&storage), Arc::clone(&clock), session_ttl);
        let stored = storage.load()?;
        let initial = match stored.user {
            Some(user) => Identity::Authenticated(user),
            None => stored
                .session()
                .filter(|s| s.is_valid_at(clock.now()))
                .map_or(Identity::Unidentified, Identity::Anonymous),
        };
        let (identity, _) = watch::channel(initial);
        Ok(Self {
            api,
            sessions,
            storage,
            identity,
            transitions: Mutex::new(()),
            remote_logout: std::sync::Mutex::new(None),
        })
    }

    /// Snapshot of the active identity.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity.borrow().clone()
    }

    /// Receiver that observes every identity transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Identity> {
        self.identity.subscribe()
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionStore<A> {
        &self.sessions
    }

    /// Resolve an actor for the next request.
    ///
    /// Authenticated users are returned as-is. Otherwise the anonymous session
    /// is reused or (re)issued; an issuance failure leaves the identity
    /// [`Identity::Unidentified`] and is returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionUnavailable` when no session can be issued.
    pub async fn ensure_identity(&self) -> Result<Identity, AuthError> {
        let _guard = self.transitions.lock().await;
        let current = self.identity();
        if current.is_authenticated() {
            return Ok(current);
        }
        match self.sessions.get_or_create_session().await {
            Ok(session) => {
                let next = Identity::Anonymous(session);
                self.publish(next.clone());
                Ok(next)
            }
            Err(error) => {
                self.publish(Identity::Unidentified);
                Err(error)
            }
        }
    }

    /// Startup hook: like [`Self::ensure_identity`], but an issuance failure
    /// is logged and reported as `Unidentified` instead of an error.
    pub async fn bootstrap(&self) -> Identity {
        match self.ensure_identity().await {
            Ok(identity) => identity,
            Err(error) => {
                tracing::warn!(%error, "continuing without an anonymous session");
                Identity::Unidentified
            }
        }
    }

    /// Log in with email and password, migrating the current anonymous session.
    ///
    /// # Errors
    ///
    /// `AlreadyAuthenticated` if a user is logged in; otherwise the API error.
    /// On error the identity is unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let _guard = self.transitions.lock().await;
        let session_id = self.migrating_session_id()?;
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            session_id,
        };
        let response = self.api.login(&request).await?;
        self.complete_login(response, "password")
    }

    /// Create an account, migrating the current anonymous session.
    ///
    /// # Errors
    ///
    /// Same as [`Self::login`].
    pub async fn register(&self, form: &Registration) -> Result<AuthenticatedUser, AuthError> {
        let _guard = self.transitions.lock().await;
        let session_id = self.migrating_session_id()?;
        let request = RegisterRequest {
            name: form.display_name.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
            password_confirmation: form.password_confirmation.clone(),
            session_id,
        };
        let response = self.api.register(&request).await?;
        self.complete_login(response, "register")
    }

    /// Federated sign-in: obtain a provider token from `consent`, then
    /// exchange it like a password login.
    ///
    /// # Errors
    ///
    /// `ConsentCancelled`/`ConsentFailed` from the consent flow, otherwise as
    /// [`Self::login`]. Identity is unchanged on any error.
    pub async fn login_with_google<C: ConsentFlow>(
        &self,
        consent: &C,
    ) -> Result<AuthenticatedUser, AuthError> {
        let _guard = self.transitions.lock().await;
        if self.identity().is_authenticated() {
            return Err(AuthError::AlreadyAuthenticated);
        }
        let access_token = consent.obtain_token().await?;
        let session_id = self.migrating_session_id()?;
        let request = GoogleLoginRequest {
            access_token,
            session_id,
        };
        let response = self.api.login_google(&request).await?;
        self.complete_login(response, "google")
    }

    /// Log out locally, invalidate the server session in the background, and
    /// switch to a brand-new anonymous session.
    ///
    /// Logging out while logged out is a no-op that returns the current
    /// identity.
    ///
    /// # Errors
    ///
    /// Only `AuthError::Storage`. A failure to issue the new session is logged
    /// and leaves the identity `Unidentified`.
    pub async fn logout(&self) -> Result<Identity, AuthError> {
        let _guard = self.transitions.lock().await;
        let Some(user) = self.identity().user().cloned() else {
            return Ok(self.identity());
        };

        self.storage.update(&mut |state| state.user = None)?;
        self.publish(Identity::Unidentified);
        self.invalidate_remote(user.auth_token);
        tracing::info!(user_id = %user.user_id, "logged out");

        match self.sessions.renew().await {
            Ok(session) => {
                let next = Identity::Anonymous(session);
                self.publish(next.clone());
                Ok(next)
            }
            Err(error) => {
                tracing::warn!(%error, "logged out without an anonymous session");
                Ok(Identity::Unidentified)
            }
        }
    }

    /// Wait for the server-side logout started by [`Self::logout`], if any.
    /// Short-lived processes call this before exiting.
    pub async fn wait_for_remote_logout(&self) {
        let task = self
            .remote_logout
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    /// Replace the anonymous session with a new one. Logged-in users are
    /// rejected.
    ///
    /// # Errors
    ///
    /// `AlreadyAuthenticated`, or the session issuance error.
    pub async fn reset_session(&self) -> Result<AnonymousSession, AuthError> {
        let _guard = self.transitions.lock().await;
        if self.identity().is_authenticated() {
            return Err(AuthError::AlreadyAuthenticated);
        }
        match self.sessions.renew().await {
            Ok(session) => {
                self.publish(Identity::Anonymous(session.clone()));
                Ok(session)
            }
            Err(error) => {
                self.publish(Identity::Unidentified);
                Err(error)
            }
        }
    }

    /// Record an observed credit balance. Local only.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when no user is logged in, or `Storage`.
    pub fn update_credits(&self, credits: u32) -> Result<(), AuthError> {
        let Some(mut user) = self.identity().user().cloned() else {
            return Err(AuthError::NotAuthenticated);
        };
        if user.credits == credits {
            return Ok(());
        }
        self.storage.update(&mut |state| {
            if let Some(stored) = state.user.as_mut() {
                stored.credits = credits;
            }
        })?;
        tracing::debug!(from = user.credits, to = credits, "credit balance changed");
        user.credits = credits;
        self.publish(Identity::Authenticated(user));
        Ok(())
    }

    /// Fetch the account from the server and record its credit balance.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated`, the API error, or `Storage`.
    pub async fn refresh_credits(&self) -> Result<u32, AuthError> {
        let Some(user) = self.identity().user().cloned() else {
            return Err(AuthError::NotAuthenticated);
        };
        let profile = self.api.me(&user.auth_token).await?;
        let credits = profile.credits.unwrap_or(user.credits);
        self.update_credits(credits)?;
        Ok(credits)
    }

    /// The anonymous session to hand over on login. Does not issue one.
    fn migrating_session_id(&self) -> Result<Option<String>, AuthError> {
        let identity = self.identity();
        if identity.is_authenticated() {
            return Err(AuthError::AlreadyAuthenticated);
        }
        if let Some(id) = identity.session_id() {
            return Ok(Some(id.to_string()));
        }
        Ok(self.sessions.current()?.map(|s| s.session_id))
    }

    fn complete_login(&self, response: AuthResponse, method: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(reason) = response.migration_error.as_deref() {
            tracing::warn!(%reason, "anonymous reports were not migrated");
        }
        let user = response.into_user();
        self.storage.update(&mut |state| {
            state.user = Some(user.clone());
            state.clear_session();
        })?;
        tracing::info!(user_id = %user.user_id, method, "logged in");
        self.publish(Identity::Authenticated(user.clone()));
        Ok(user)
    }

    fn publish(&self, next: Identity) {
        self.identity.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    /// Fire-and-forget `POST /auth/logout`; failures are only logged.
    fn invalidate_remote(&self, token: String) {
        let api = Arc::clone(&self.api);
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let task = runtime.spawn(async move {
            if let Err(error) = api.logout(&token).await {
                tracing::warn!(%error, "server-side logout failed");
            }
        });
        *self
            .remote_logout
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(task);
    }
}

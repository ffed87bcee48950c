use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A client-held anonymous identifier scoping resources created before login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnonymousSession {
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

impl AnonymousSession {
    /// A session is usable while `expires_at` is strictly in the future.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// A logged-in account as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub auth_token: String,
    #[serde(default)]
    pub credits: u32,
}

/// The active actor. Exactly one variant is held at a time.
///
/// `Unidentified` only occurs while no session could be issued; anonymous
/// report features are disabled in that state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    #[default]
    Unidentified,
    Anonymous(AnonymousSession),
    Authenticated(AuthenticatedUser),
}

impl Identity {
    /// Request scope for the identity, `None` when unidentified.
    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        match self {
            Self::Unidentified => None,
            Self::Anonymous(session) => Some(Scope::Session {
                session_id: session.session_id.clone(),
            }),
            Self::Authenticated(user) => Some(Scope::User {
                user_id: user.user_id.clone(),
                token: user.auth_token.clone(),
            }),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Anonymous(session) => Some(&session.session_id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// How an outgoing request is attributed: bearer token or `session_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    User { user_id: String, token: String },
    Session { session_id: String },
}

impl Scope {
    /// Stable cache key. Never contains the bearer token.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::User { user_id, .. } => format!("user:{user_id}"),
            Self::Session { session_id } => format!("session:{session_id}"),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Session { session_id } => Some(session_id),
            Self::User { .. } => None,
        }
    }

    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        match self {
            Self::User { token, .. } => Some(token),
            Self::Session { .. } => None,
        }
    }
}

use lemon_api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("already logged in; run `lemonlens auth logout` first")]
    AlreadyAuthenticated,

    #[error("not logged in; run `lemonlens auth login`")]
    NotAuthenticated,

    #[error("could not obtain an anonymous session: {0}")]
    SessionUnavailable(#[source] ApiError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("state storage error: {0}")]
    Storage(String),

    #[error("sign-in was cancelled")]
    ConsentCancelled,

    #[error("browser sign-in failed: {0}")]
    ConsentFailed(String),

    #[error("{0} is not configured")]
    NotConfigured(String),
}

impl AuthError {
    /// Bad credentials as opposed to a transport or server fault.
    #[must_use]
    pub const fn is_rejected_credentials(&self) -> bool {
        matches!(
            self,
            Self::Api(ApiError::Unauthorized(_) | ApiError::Validation(_))
        )
    }
}

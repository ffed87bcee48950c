use lemon_api::ApiError;
use lemon_auth::AuthError;
use lemon_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Neither a user nor an anonymous session is available.
    #[error("no session available; report features are disabled until one can be issued")]
    NoIdentity(#[source] AuthError),

    /// Rejected client-side before any request was made.
    #[error("invalid report input: {0}")]
    Validation(String),

    #[error("premium reports require an account; run `lemonlens auth login`")]
    PremiumRequiresLogin,

    /// The server refused the report for lack of credits (HTTP 402).
    #[error("not enough credits for this report ({message}); run `lemonlens checkout <price_id>` to buy more")]
    InsufficientCredits {
        required: Option<u32>,
        current: Option<u32>,
        message: String,
    },

    #[error("report {id} not found")]
    NotFound { id: String },

    #[error(transparent)]
    Api(ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Core(CoreError),
}

impl From<ApiError> for ReportError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::InsufficientCredits {
                required,
                current,
                message,
            } => Self::InsufficientCredits {
                required,
                current,
                message,
            },
            other => Self::Api(other),
        }
    }
}

impl From<CoreError> for ReportError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(message) => Self::Validation(message),
            other => Self::Core(other),
        }
    }
}

impl ReportError {
    /// Whether a retry of the same action could succeed without user input.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Api(error) => error.is_transient(),
            Self::NoIdentity(_) => true,
            _ => false,
        }
    }
}

//! Errors raised by the data model.
//!
//! Transport, auth, and report-service errors live in their own crates.

use thiserror::Error;

/// Errors that can be raised by the core model.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A status transition was attempted that is not allowed.
    #[error("Invalid state transition: report {id} from {from} to {to}")]
    InvalidTransition { id: String, from: String, to: String },

    /// Input failed client-side validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A payload could not be mapped onto the canonical model.
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

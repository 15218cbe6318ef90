//! Unified error handling for DeftMail Core

use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("Domain not verified: {0}")]
    DomainNotVerified(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Mail server error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the error is expected in normal operation (caller mistakes,
    /// lifecycle preconditions). Expected errors are logged at `warn`,
    /// everything else at `error`.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_)
                | AppError::Conflict(_)
                | AppError::LimitExceeded(_)
                | AppError::DomainNotVerified(_)
                | AppError::Validation(_)
        )
    }

    /// Upstream error from a mail server response.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        AppError::Upstream {
            status,
            message: message.into(),
        }
    }
}

// Conversion from validation errors
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

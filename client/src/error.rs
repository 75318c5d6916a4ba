//! Store errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend could not be reached (connect failure or timeout)
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// Invalid credentials, duplicate account, or missing session
    #[error("{0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// The backend answered with a non-success status
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered with a body we could not understand
    #[error("Unexpected response: {0}")]
    Protocol(String),

    #[error("Local storage error: {0}")]
    Local(#[from] anyhow::Error),
}

impl StoreError {
    /// Whether this error should switch a fallback store to local mode
    pub fn is_unreachable(&self) -> bool {
        matches!(self, StoreError::Unreachable(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

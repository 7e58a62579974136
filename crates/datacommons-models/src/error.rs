//! Error types for the Data Commons client

use thiserror::Error;

/// Result type for Data Commons operations
pub type DcResult<T> = Result<T, DataCommonsError>;

/// Errors that can occur when talking to the Data Commons API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataCommonsError {
    /// Error communicating with the remote service (connect, timeout, I/O)
    #[error("Communication error: {0}")]
    CommunicationError(String),

    /// The remote service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body, or a placeholder if it could not be read
        body: String,
    },

    /// The response could not be decoded into the expected shape
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid input parameters, rejected before any request is made
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unknown or insufficient `select` fields for an observation query
    #[error("Invalid observation select: {0}")]
    InvalidObservationSelect(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for DataCommonsError {
    fn from(error: serde_json::Error) -> Self {
        DataCommonsError::SerializationError(error.to_string())
    }
}

impl DataCommonsError {
    /// Whether the error was raised by the caller's input rather than the service
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            DataCommonsError::InvalidParameter(_) | DataCommonsError::InvalidObservationSelect(_)
        )
    }
}

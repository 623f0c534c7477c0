//! Error types for RouterOS reconciliation
//!
//! Every failure surfaces as one [`Error`]. Configuration problems are detected
//! before any network traffic; request problems carry the REST path that failed.

use thiserror::Error;

/// Result type alias for RouterOS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for RouterOS reconciliation
#[derive(Error, Debug)]
pub enum Error {
    /// A required connection parameter is missing or unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// A REST call failed: non-2xx status, transport failure, or an
    /// undecodable response
    #[error("REST API call to {path} failed: {cause}")]
    Request {
        /// REST path relative to `/rest/`
        path: String,
        /// HTTP status, when the device answered at all
        status: Option<u16>,
        /// Underlying cause, including the device's error body when present
        cause: String,
    },

    /// The desired state handed to the engine is unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a request error without an HTTP status (transport or decoding failure)
    pub fn request(path: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::Request {
            path: path.into(),
            status: None,
            cause: cause.into(),
        }
    }

    /// Create a request error for a non-2xx response
    pub fn status(path: impl Into<String>, status: u16, body: impl AsRef<str>) -> Self {
        let body = body.as_ref().trim();
        let cause = if body.is_empty() {
            format!("return code: {}", status)
        } else {
            format!("return code: {} - {}", status, body)
        };

        Self::Request {
            path: path.into(),
            status: Some(status),
            cause,
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error was raised before any request was attempted
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidInput(_))
    }

    /// The REST path involved, for request errors
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Request { path, .. } => Some(path),
            _ => None,
        }
    }
}

//! Error types for the REST API client.

use thiserror::Error;

use crate::wizard::SubmitError;

/// Errors returned by [`ApiClient`](super::ApiClient).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to reach the backend
    #[error("Request to '{path}' failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured timeout
    #[error("Request to '{path}' timed out")]
    Timeout { path: String },

    /// The backend has no such record
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Missing or rejected credentials
    #[error("Not authorized: {message}")]
    Unauthorized { status: u16, message: String },

    /// Envelope with `success: false` or a non-2xx status
    #[error("{message} (status {status})")]
    Rejected { status: u16, message: String },

    /// Body could not be decoded
    #[error("Failed to decode response from '{path}': {reason}")]
    Decode { path: String, reason: String },

    /// Successful envelope without the expected `data`
    #[error("Response from '{path}' contained no data")]
    MissingData { path: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ApiError {
    /// Map a backend status code and message to an error variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => ApiError::NotFound { message },
            401 | 403 => ApiError::Unauthorized { status, message },
            _ => ApiError::Rejected { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Text suitable for showing to a user: the backend's own message where
    /// there is one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { message, .. }
            | ApiError::NotFound { message }
            | ApiError::Unauthorized { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<ApiError> for SubmitError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport { .. } | ApiError::Timeout { .. } => {
                SubmitError::Transport(err.to_string())
            }
            other => SubmitError::Rejected(other.user_message()),
        }
    }
}

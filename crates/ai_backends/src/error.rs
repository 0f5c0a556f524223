//! Backend client errors

use thiserror::Error;

/// Errors a backend client can produce
#[derive(Debug, Error)]
pub enum BackendError {
    /// Failed to reach the backend
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request failed in transit
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Backend reported quota or rate-limit exhaustion
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Backend rejected the request as malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backend returned a server-side error status
    #[error("Server error (status {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request exceeded the client timeout
    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

impl BackendError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let message = body.into();
        match status {
            429 => Self::QuotaExceeded(message),
            400 | 404 | 422 => Self::InvalidRequest(message),
            401 | 403 => Self::InvalidRequest(format!("authentication rejected: {message}")),
            408 => Self::Timeout(0),
            _ => Self::ServerError { status, message },
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(0)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

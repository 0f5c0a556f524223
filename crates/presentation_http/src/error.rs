//! API error handling
//!
//! Responses never leak provider-internal error text: generation failures
//! surface the capability and the fact that its chain was exhausted, nothing
//! more.

use application::{ApplicationError, ports::FailureKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Seconds until the caller should retry, on rate limiting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, retry_after_seconds) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            Self::RateLimited {
                retry_after_seconds,
            } => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Rate limit exceeded".to_string(),
                Some(retry_after_seconds),
            ),
            Self::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
            Self::Internal(_) => (
                // Internal detail stays out of the body
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            retry_after_seconds,
        };

        (status, Json(body)).into_response()
    }
}

impl From<domain::DomainError> for ApiError {
    fn from(err: domain::DomainError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::Generation(e) => {
                // The orchestration error's display names the capability and
                // the attempt count only; provider text never reaches here.
                if e.kind == FailureKind::InvalidInput {
                    Self::BadRequest(e.to_string())
                } else {
                    Self::ServiceUnavailable(e.to_string())
                }
            }
            ApplicationError::RateLimited => Self::RateLimited {
                retry_after_seconds: 1,
            },
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use application::{OrchestrationError, ProviderAttempt, ports::Capability};

    use super::*;

    #[test]
    fn rate_limited_response_carries_retry_hint() {
        let response = ApiError::RateLimited {
            retry_after_seconds: 42,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn exhausted_generation_maps_to_service_unavailable() {
        let err = ApplicationError::Generation(OrchestrationError::exhausted(
            Capability::TextGeneration,
            vec![ProviderAttempt {
                provider: "openai".to_string(),
                kind: FailureKind::QuotaExceeded,
            }],
        ));
        let api: ApiError = err.into();
        assert!(matches!(api, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn invalid_input_generation_maps_to_bad_request() {
        let err = ApplicationError::Generation(OrchestrationError::short_circuit(
            Capability::TextGeneration,
            FailureKind::InvalidInput,
            vec![],
        ));
        let api: ApiError = err.into();
        assert!(matches!(api, ApiError::BadRequest(_)));
    }

    #[test]
    fn internal_errors_hide_their_detail() {
        let response = ApiError::Internal("connection string leaked".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_omits_absent_retry_hint() {
        let body = ErrorResponse {
            error: "Bad request".to_string(),
            code: "bad_request".to_string(),
            retry_after_seconds: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("retry_after_seconds"));
    }

    #[test]
    fn error_response_includes_retry_hint_when_present() {
        let body = ErrorResponse {
            error: "Rate limit exceeded".to_string(),
            code: "rate_limited".to_string(),
            retry_after_seconds: Some(17),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"retry_after_seconds\":17"));
    }
}

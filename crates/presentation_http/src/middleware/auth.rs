//! API key authentication middleware
//!
//! Validates the `X-API-Key` header against the single configured key using
//! a constant-time comparison. Authentication is disabled when no key is
//! configured; `/health` is always exempt.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tower::{Layer, Service};
use tracing::debug;

use crate::error::ApiError;

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Layer that applies API key authentication
#[derive(Clone, Debug)]
pub struct ApiKeyAuthLayer {
    api_key: Option<Arc<str>>,
    excluded_paths: Vec<String>,
}

impl ApiKeyAuthLayer {
    /// Create a layer; `None` disables authentication entirely
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.map(Into::into),
            excluded_paths: vec!["/health".to_string()],
        }
    }

    /// Add paths that should be excluded from authentication
    #[must_use]
    pub fn exclude_paths(mut self, paths: Vec<String>) -> Self {
        self.excluded_paths.extend(paths);
        self
    }
}

impl<S> Layer<S> for ApiKeyAuthLayer {
    type Service = ApiKeyAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyAuth {
            inner,
            api_key: self.api_key.clone(),
            excluded_paths: self.excluded_paths.clone(),
        }
    }
}

/// Middleware service for API key authentication
#[derive(Clone, Debug)]
pub struct ApiKeyAuth<S> {
    inner: S,
    api_key: Option<Arc<str>>,
    excluded_paths: Vec<String>,
}

/// Constant-time equality over key bytes
fn keys_match(expected: &str, provided: &str) -> bool {
    expected.len() == provided.len()
        && bool::from(expected.as_bytes().ct_eq(provided.as_bytes()))
}

impl<S> Service<Request> for ApiKeyAuth<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let api_key = self.api_key.clone();
        let excluded_paths = self.excluded_paths.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let Some(expected) = api_key else {
                // No key configured: authentication disabled
                return inner.call(req).await;
            };

            let path = req.uri().path();
            if excluded_paths.iter().any(|p| path.starts_with(p)) {
                return inner.call(req).await;
            }

            let provided = req
                .headers()
                .get(API_KEY_HEADER)
                .and_then(|v| v.to_str().ok());

            match provided {
                Some(provided) if keys_match(&expected, provided) => {
                    debug!("API key verified");
                    inner.call(req).await
                }
                Some(_) => Ok(ApiError::Unauthorized("Invalid API key".to_string())
                    .into_response()),
                None => Ok(ApiError::Unauthorized(
                    "Missing X-API-Key header".to_string(),
                )
                .into_response()),
            }
        })
    }
}

//! Rate limiting middleware
//!
//! Delegates admission to the application [`RateLimiter`] and turns a
//! rejection into `429` with a deterministic `retry_after_seconds` hint.
//! Identity is the forwarded client address; `/health` is exempt.

use std::{
    future::Future,
    net::IpAddr,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use application::services::{Admission, RateLimiter};
use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::error::ApiError;

/// Layer that applies rate limiting
#[derive(Clone, Debug)]
pub struct RateLimitLayer {
    limiter: Arc<RateLimiter>,
    enabled: bool,
    excluded_paths: Vec<String>,
}

impl RateLimitLayer {
    /// Create a layer over a shared limiter
    #[must_use]
    pub fn new(limiter: Arc<RateLimiter>, enabled: bool) -> Self {
        Self {
            limiter,
            enabled,
            excluded_paths: vec!["/health".to_string()],
        }
    }

    /// The shared limiter, for cleanup tasks
    #[must_use]
    pub fn limiter(&self) -> Arc<RateLimiter> {
        Arc::clone(&self.limiter)
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimit<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimit {
            inner,
            limiter: Arc::clone(&self.limiter),
            enabled: self.enabled,
            excluded_paths: self.excluded_paths.clone(),
        }
    }
}

/// Middleware service for rate limiting
#[derive(Clone, Debug)]
pub struct RateLimit<S> {
    inner: S,
    limiter: Arc<RateLimiter>,
    enabled: bool,
    excluded_paths: Vec<String>,
}

/// Client identity for admission: the forwarded address when present,
/// otherwise the loopback placeholder
fn client_identity(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        // First address in the chain is the original client
        if let Some(ip) = forwarded
            .split(',')
            .next()
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return ip.to_string();
        }
    }

    "127.0.0.1".to_string()
}

impl<S> Service<Request> for RateLimit<S>
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
        let enabled = self.enabled;
        let limiter = Arc::clone(&self.limiter);
        let excluded_paths = self.excluded_paths.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if !enabled {
                return inner.call(req).await;
            }

            let path = req.uri().path();
            if excluded_paths.iter().any(|p| path.starts_with(p)) {
                return inner.call(req).await;
            }

            match limiter.admit(&client_identity(&req)) {
                Admission::Admitted => inner.call(req).await,
                Admission::Rejected { retry_after } => Ok(ApiError::RateLimited {
                    retry_after_seconds: retry_after.as_secs().max(1),
                }
                .into_response()),
            }
        })
    }
}

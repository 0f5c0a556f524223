//! HTTP middleware

pub mod auth;
pub mod rate_limit;

pub use auth::ApiKeyAuthLayer;
pub use rate_limit::RateLimitLayer;

//! Application services

pub mod estimator;
pub mod fallback;
pub mod generation;
pub mod parser;
pub mod prompts;
pub mod rate_limiter;

pub use estimator::{CostEstimate, CostEstimator, PricingTable, TierPricing, plan_batch};
pub use fallback::{ChainSuccess, FallbackChain};
pub use generation::{ExecuteOptions, Generated, GenerationService};
pub use rate_limiter::{Admission, RateLimiter, RateLimiterConfig};

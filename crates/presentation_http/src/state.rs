//! Application state shared across handlers

use std::sync::Arc;

use application::services::{CostEstimator, GenerationService};
use infrastructure::config::GenerationConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Generation coordinator
    pub generation: Arc<GenerationService>,
    /// Offline cost estimator
    pub estimator: Arc<CostEstimator>,
    /// Generation defaults applied when a request omits a field
    pub defaults: Arc<GenerationConfig>,
}

//! Cost estimation handler
//!
//! Always dry-run: the request batch goes to the estimator, never to the
//! coordinator, so no cache entry is read or written and no provider is
//! invoked.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use application::services::{CostEstimate, plan_batch};
use domain::{ChannelId, CostTier, OutputKind, ShortsCount, ThemeText};

use crate::{error::ApiError, state::AppState};

fn default_num_shorts() -> u8 {
    4
}

/// Estimation request body
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    /// Content channel
    pub channel: String,
    /// What the run would produce: long | shorts | both
    pub output_type: String,
    /// Planned number of shorts (1-8)
    #[serde(default = "default_num_shorts")]
    pub num_shorts: u8,
    /// Theme; the channel default applies when omitted
    #[serde(default)]
    pub theme: Option<String>,
    /// Cost tier to price at
    #[serde(default)]
    pub tier: CostTier,
    /// Production week
    #[serde(default)]
    pub week: u32,
}

/// Estimate the cost of a planned run without any provider call
#[instrument(skip(state, request), fields(channel = %request.channel, tier = %request.tier))]
pub async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<CostEstimate>, ApiError> {
    let channel = ChannelId::parse(&request.channel)?;
    let theme = ThemeText::parse(
        request
            .theme
            .as_deref()
            .unwrap_or(&state.defaults.default_theme),
    )?;
    let output: OutputKind = request
        .output_type
        .parse()
        .map_err(|e: domain::DomainError| ApiError::BadRequest(e.to_string()))?;
    let num_shorts = ShortsCount::parse(request.num_shorts)?;

    let specs = plan_batch(
        &channel,
        &theme,
        request.week,
        request.tier,
        output,
        num_shorts,
        state.defaults.duration_minutes,
        state.defaults.images_per_video,
        "alloy",
    )?;

    Ok(Json(state.estimator.estimate(&specs, request.tier)))
}

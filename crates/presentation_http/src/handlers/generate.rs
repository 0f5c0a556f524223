//! Generation handlers: title options and shorts extraction

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use application::services::ExecuteOptions;
use domain::{
    ChannelId, CostTier, OperationParams, RequestSpec, ShortClip, ShortsCount, ThemeText,
    TitleSet,
};

use crate::{error::ApiError, state::AppState};

/// Title generation request body
#[derive(Debug, Deserialize)]
pub struct TitlesRequest {
    /// Content channel
    pub channel: String,
    /// Video topic
    pub theme: String,
    /// Production week, part of the cache identity
    #[serde(default)]
    pub week: u32,
    /// Cost tier
    #[serde(default)]
    pub tier: CostTier,
}

/// Title generation response body
#[derive(Debug, Serialize)]
pub struct TitlesResponse {
    pub titles: Vec<String>,
    pub thumbnails: Vec<String>,
    /// Whether the result came from the cache
    pub cached: bool,
    /// Provider that produced the artifact
    pub provider: String,
}

/// Generate title and thumbnail-text options
#[instrument(skip(state, request), fields(channel = %request.channel))]
pub async fn generate_titles(
    State(state): State<AppState>,
    Json(request): Json<TitlesRequest>,
) -> Result<Json<TitlesResponse>, ApiError> {
    let channel = ChannelId::parse(&request.channel)?;
    let theme = ThemeText::parse(&request.theme)?;
    let params = OperationParams::titles(OperationParams::DEFAULT_TITLE_OPTIONS)?;
    let spec = RequestSpec::new(channel, theme, request.week, request.tier, params);

    let generated = state
        .generation
        .execute(&spec, ExecuteOptions::default())
        .await?;
    let set: TitleSet = generated.artifact.decode_payload()?;

    Ok(Json(TitlesResponse {
        titles: set.titles,
        thumbnails: set.thumbnails,
        cached: generated.cache_hit,
        provider: generated.artifact.provider,
    }))
}

fn default_num_shorts() -> u8 {
    4
}

fn default_shorts_channel() -> String {
    "api".to_string()
}

fn default_shorts_theme() -> String {
    "short-form extraction".to_string()
}

/// Shorts extraction request body
#[derive(Debug, Deserialize)]
pub struct ShortsRequest {
    /// Long-form script to extract from
    pub script: String,
    /// How many clips to extract (1-8)
    #[serde(default = "default_num_shorts")]
    pub num_shorts: u8,
    /// Content channel
    #[serde(default = "default_shorts_channel")]
    pub channel: String,
    /// Theme, part of the cache identity
    #[serde(default = "default_shorts_theme")]
    pub theme: String,
    /// Cost tier
    #[serde(default)]
    pub tier: CostTier,
}

/// Shorts extraction response body
#[derive(Debug, Serialize)]
pub struct ShortsResponse {
    pub shorts: Vec<ShortClip>,
    /// Whether the result came from the cache
    pub cached: bool,
    /// Provider that produced the artifact
    pub provider: String,
}

/// Extract short-form clips from a long-form script
#[instrument(skip(state, request), fields(num_shorts = request.num_shorts))]
pub async fn generate_shorts(
    State(state): State<AppState>,
    Json(request): Json<ShortsRequest>,
) -> Result<Json<ShortsResponse>, ApiError> {
    let channel = ChannelId::parse(&request.channel)?;
    let theme = ThemeText::parse(&request.theme)?;
    let num_shorts = ShortsCount::parse(request.num_shorts)?;
    let params = OperationParams::shorts_extraction(&request.script, num_shorts)?;
    let spec = RequestSpec::new(channel, theme, 0, request.tier, params);

    let generated = state
        .generation
        .execute(&spec, ExecuteOptions::default())
        .await?;
    let shorts: Vec<ShortClip> = generated.artifact.decode_payload()?;

    Ok(Json(ShortsResponse {
        shorts,
        cached: generated.cache_hit,
        provider: generated.artifact.provider,
    }))
}

//! Provider request construction
//!
//! Turns a [`RequestSpec`] into the concrete request its capability needs.
//! The templates only parameterize structure (theme, counts, durations);
//! their copy is deliberately plain — content curation happens upstream.

use domain::{CostTier, OperationParams, RequestSpec};

use crate::ports::provider::ProviderRequest;

/// Characters of the source script kept in an extraction prompt
pub const SCRIPT_EXCERPT_CHARS: usize = 4000;

/// Token budget per text call, by tier
pub const fn max_tokens(tier: CostTier) -> u32 {
    match tier {
        CostTier::Free => 2000,
        CostTier::Low => 3000,
        CostTier::High => 4000,
    }
}

/// Character budget per narration call, by tier
pub const fn tts_char_cap(tier: CostTier) -> usize {
    match tier {
        CostTier::Free => 3000,
        CostTier::Low => 5000,
        CostTier::High => 10_000,
    }
}

/// Build the provider request for a spec
pub fn provider_request(spec: &RequestSpec) -> ProviderRequest {
    let tier = spec.tier();
    match spec.params() {
        OperationParams::Script { duration_minutes } => {
            let words_per_minute = tier.narration_words_per_minute();
            let segments = (*duration_minutes / 5).max(1);
            ProviderRequest::Text {
                system: "You write narration scripts for faceless videos. Your scripts are \
                         engaging, structured and safe to narrate verbatim."
                    .to_string(),
                prompt: format!(
                    "Write a {duration_minutes}-minute narration script about: {theme}\n\n\
                     Target roughly {words_per_minute} spoken words per minute. Divide the \
                     content into {segments} segments, each with a clear sub-topic.\n\n\
                     Format your response as:\n\
                     SEGMENT 1: [Title]\n\
                     [Narration for this segment]\n\n\
                     SEGMENT 2: [Title]\n\
                     [Narration for this segment]\n\n\
                     ... continue for all {segments} segments.",
                    theme = spec.theme(),
                ),
                max_tokens: max_tokens(tier),
            }
        }
        OperationParams::Titles { options } => ProviderRequest::Text {
            system: "You are a video title and thumbnail copy specialist.".to_string(),
            prompt: format!(
                "Generate {options} title options and {options} thumbnail text options for a \
                 video about:\n\nTopic: {theme}\n\n\
                 Requirements:\n\
                 - Titles: engaging, SEO-friendly, under 70 characters\n\
                 - Thumbnail text: 3-7 words, high contrast with the title\n\n\
                 Format your response as:\n\
                 TITLES:\n1. [Title option]\n...\n\n\
                 THUMBNAILS:\n1. [Thumbnail text option]\n...",
                theme = spec.theme(),
            ),
            max_tokens: 500,
        },
        OperationParams::ShortsExtraction {
            source_script,
            num_shorts,
        } => {
            // ~130 wpm spoken, one minute per clip
            let max_words = 130;
            let excerpt: String = source_script.chars().take(SCRIPT_EXCERPT_CHARS).collect();
            ProviderRequest::Text {
                system: "You extract engaging short-form video segments from long-form \
                         scripts, optimizing for retention."
                    .to_string(),
                prompt: format!(
                    "From the following long-form script, extract exactly {num_shorts} \
                     short-form video segments.\n\n\
                     Each short should be approximately {max_words} words, work as a \
                     standalone vertical clip and start with a strong hook.\n\n\
                     For each short, provide:\n\
                     SHORT [N]: [Title]\n\
                     HOOK: [First 1-2 sentences that grab attention]\n\
                     SCRIPT: [Full narration script for the short]\n\
                     CAPTION: [Social media caption, max 150 chars]\n\
                     HASHTAGS: [5-8 relevant hashtags]\n\
                     ---\n\n\
                     LONG-FORM SCRIPT:\n{excerpt}\n\n\
                     Extract {num_shorts} shorts now:",
                ),
                max_tokens: max_tokens(tier).min(3000),
            }
        }
        OperationParams::Narration { source_text, voice } => {
            let text: String = source_text.chars().take(tts_char_cap(tier)).collect();
            ProviderRequest::Speech {
                text,
                voice: voice.clone(),
            }
        }
        OperationParams::Images { query, count } => ProviderRequest::ImageSearch {
            query: query.clone(),
            count: *count,
        },
    }
}

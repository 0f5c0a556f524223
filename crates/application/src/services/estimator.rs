//! Offline cost estimation
//!
//! Pure function over planned request specs and a pricing table: no network
//! call, no cache access, bit-for-bit deterministic. Powers dry-run mode,
//! which routes a batch here instead of the coordinator.
//!
//! The same table prices live accounting; keeping both on one object is what
//! lets startup validation catch a diverging configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use domain::{
    ChannelId, CostTier, DomainError, Operation, OperationParams, OutputKind, RequestSpec,
    ShortsCount, ThemeText,
};

use crate::error::ApplicationError;

/// Unit prices for one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPricing {
    /// Text model the tier selects
    pub model: String,
    /// USD per 1000 input tokens
    pub input_usd_per_1k_tokens: f64,
    /// USD per 1000 output tokens
    pub output_usd_per_1k_tokens: f64,
    /// USD per 1000 narrated characters
    pub tts_usd_per_1k_chars: f64,
    /// USD per stock image
    pub image_usd_per_unit: f64,
}

/// Per-tier unit-price table shared by dry-run and live accounting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTable {
    pub free: TierPricing,
    pub low: TierPricing,
    pub high: TierPricing,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            free: TierPricing {
                model: "gpt-3.5-turbo".to_string(),
                input_usd_per_1k_tokens: 0.0015,
                output_usd_per_1k_tokens: 0.002,
                tts_usd_per_1k_chars: 0.0,
                image_usd_per_unit: 0.0,
            },
            low: TierPricing {
                model: "gpt-4o-mini".to_string(),
                input_usd_per_1k_tokens: 0.002,
                output_usd_per_1k_tokens: 0.004,
                tts_usd_per_1k_chars: 0.05,
                image_usd_per_unit: 0.0,
            },
            high: TierPricing {
                model: "gpt-4o".to_string(),
                input_usd_per_1k_tokens: 0.005,
                output_usd_per_1k_tokens: 0.015,
                tts_usd_per_1k_chars: 0.18,
                image_usd_per_unit: 0.02,
            },
        }
    }
}

impl PricingTable {
    /// Prices for one tier
    pub const fn for_tier(&self, tier: CostTier) -> &TierPricing {
        match tier {
            CostTier::Free => &self.free,
            CostTier::Low => &self.low,
            CostTier::High => &self.high,
        }
    }

    /// Reject tables with negative prices or prices that decrease along the
    /// tier order — a diverging table silently skews dry-run numbers, so it
    /// is a startup error
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let fields: [(&str, fn(&TierPricing) -> f64); 4] = [
            ("input_usd_per_1k_tokens", |t| t.input_usd_per_1k_tokens),
            ("output_usd_per_1k_tokens", |t| t.output_usd_per_1k_tokens),
            ("tts_usd_per_1k_chars", |t| t.tts_usd_per_1k_chars),
            ("image_usd_per_unit", |t| t.image_usd_per_unit),
        ];

        for (name, field) in fields {
            let ordered = [field(&self.free), field(&self.low), field(&self.high)];
            if ordered.iter().any(|price| *price < 0.0) {
                return Err(ApplicationError::Configuration(format!(
                    "pricing.{name} must not be negative"
                )));
            }
            if ordered[0] > ordered[1] || ordered[1] > ordered[2] {
                return Err(ApplicationError::Configuration(format!(
                    "pricing.{name} must be non-decreasing across free <= low <= high"
                )));
            }
        }

        for tier in CostTier::ALL {
            if self.for_tier(tier).model.trim().is_empty() {
                return Err(ApplicationError::Configuration(format!(
                    "pricing.{tier}.model must be set"
                )));
            }
        }

        Ok(())
    }
}

/// Predicted price of a batch of operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Tier the batch was priced at
    pub tier: CostTier,
    /// Predicted units per operation (tokens, characters or items)
    pub per_stage: BTreeMap<Operation, u64>,
    /// Sum of all stage units
    pub total_units: u64,
    /// Predicted spend in USD
    pub total_usd: f64,
}

/// Network-free estimator over a shared pricing table
#[derive(Debug, Clone)]
pub struct CostEstimator {
    pricing: PricingTable,
}

impl CostEstimator {
    /// Create an estimator over a validated pricing table
    pub const fn new(pricing: PricingTable) -> Self {
        Self { pricing }
    }

    /// The shared pricing table
    pub const fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Estimate a batch of planned operations at one tier
    ///
    /// The explicit tier prices the whole batch, matching how a dry-run
    /// prices the run it replaces.
    pub fn estimate(&self, specs: &[RequestSpec], tier: CostTier) -> CostEstimate {
        let prices = self.pricing.for_tier(tier);
        let mut per_stage: BTreeMap<Operation, u64> = BTreeMap::new();
        let mut total_units: u64 = 0;
        let mut total_usd: f64 = 0.0;

        for spec in specs {
            let (units, usd) = stage_cost(spec, tier, prices);
            *per_stage.entry(spec.operation()).or_default() += units;
            total_units += units;
            total_usd += usd;
        }

        CostEstimate {
            tier,
            per_stage,
            total_units,
            total_usd,
        }
    }
}

/// Plan the spec batch a run would execute
///
/// This is what dry-run prices: the same stages, in the same shape, that a
/// live run would hand to the coordinator. Narration is priced on the
/// expected script length (roughly six characters per spoken word) since the
/// actual script does not exist yet.
#[allow(clippy::too_many_arguments)]
pub fn plan_batch(
    channel: &ChannelId,
    theme: &ThemeText,
    week: u32,
    tier: CostTier,
    output: OutputKind,
    num_shorts: ShortsCount,
    duration_minutes: u32,
    images_per_video: u8,
    voice: &str,
) -> Result<Vec<RequestSpec>, DomainError> {
    let make = |params: OperationParams| {
        RequestSpec::new(channel.clone(), theme.clone(), week, tier, params)
    };

    let mut specs = Vec::new();

    if output.includes_long() {
        specs.push(make(OperationParams::script(duration_minutes)?));
        specs.push(make(OperationParams::titles(
            OperationParams::DEFAULT_TITLE_OPTIONS,
        )?));

        let expected_chars = duration_minutes as usize
            * tier.narration_words_per_minute() as usize
            * 6;
        specs.push(make(OperationParams::narration(
            "x".repeat(expected_chars),
            voice,
        )?));

        if images_per_video > 0 {
            specs.push(make(OperationParams::images(
                theme.as_str(),
                images_per_video,
            )?));
        }
    }

    if output.includes_shorts() {
        specs.push(make(OperationParams::shorts_extraction(
            "pending long-form script",
            num_shorts,
        )?));
    }

    Ok(specs)
}

/// Token estimate for free text: ~4 characters per token plus prompt overhead
fn prompt_tokens(chars: usize) -> u64 {
    chars as u64 / 4 + 500
}

/// Units and USD for one stage
#[allow(clippy::cast_precision_loss)]
fn stage_cost(spec: &RequestSpec, tier: CostTier, prices: &TierPricing) -> (u64, f64) {
    let text_usd = |input: u64, output: u64| {
        (input as f64 / 1000.0).mul_add(
            prices.input_usd_per_1k_tokens,
            (output as f64 / 1000.0) * prices.output_usd_per_1k_tokens,
        )
    };

    match spec.params() {
        OperationParams::Script { duration_minutes } => {
            let input = prompt_tokens(spec.theme().char_len());
            // ~1.4 tokens per spoken word
            let words =
                u64::from(*duration_minutes) * u64::from(tier.narration_words_per_minute());
            let output = words * 14 / 10;
            (input + output, text_usd(input, output))
        }
        OperationParams::Titles { .. } => {
            let input = spec.theme().char_len() as u64 / 4 + 200;
            let output = 400;
            (input + output, text_usd(input, output))
        }
        OperationParams::ShortsExtraction {
            source_script,
            num_shorts,
        } => {
            let input = prompt_tokens(source_script.chars().count());
            let output = u64::from(num_shorts.get()) * 200;
            (input + output, text_usd(input, output))
        }
        OperationParams::Narration { source_text, .. } => {
            let chars = source_text.chars().count() as u64;
            (chars, chars as f64 / 1000.0 * prices.tts_usd_per_1k_chars)
        }
        OperationParams::Images { count, .. } => {
            let units = u64::from(*count);
            (units, units as f64 * prices.image_usd_per_unit)
        }
    }
}

#[cfg(test)]
mod tests {
    use domain::{ChannelId, ShortsCount, ThemeText};

    use super::*;

    fn spec(tier: CostTier, params: OperationParams) -> RequestSpec {
        RequestSpec::new(
            ChannelId::parse("finance").unwrap(),
            ThemeText::parse("index funds explained").unwrap(),
            1,
            tier,
            params,
        )
    }

    fn estimator() -> CostEstimator {
        CostEstimator::new(PricingTable::default())
    }

    fn shorts_batch(num_shorts: u8) -> Vec<RequestSpec> {
        vec![spec(
            CostTier::Free,
            OperationParams::shorts_extraction(
                "a script ".repeat(200),
                ShortsCount::parse(num_shorts).unwrap(),
            )
            .unwrap(),
        )]
    }

    #[test]
    fn estimate_is_deterministic() {
        let batch = shorts_batch(4);
        let a = estimator().estimate(&batch, CostTier::Low);
        let b = estimator().estimate(&batch, CostTier::Low);
        assert_eq!(a, b);
        assert!(a.total_usd.to_bits() == b.total_usd.to_bits());
    }

    #[test]
    fn total_units_grow_with_num_shorts() {
        let four = estimator().estimate(&shorts_batch(4), CostTier::Free);
        let five = estimator().estimate(&shorts_batch(5), CostTier::Free);
        assert!(five.total_units > four.total_units);
        assert!(five.total_usd > four.total_usd);
    }

    #[test]
    fn tiers_are_priced_in_non_decreasing_order() {
        let batch = vec![
            spec(CostTier::Free, OperationParams::script(30).unwrap()),
            spec(
                CostTier::Free,
                OperationParams::narration("text ".repeat(500), "alloy").unwrap(),
            ),
        ];
        let est = estimator();
        let free = est.estimate(&batch, CostTier::Free);
        let low = est.estimate(&batch, CostTier::Low);
        let high = est.estimate(&batch, CostTier::High);

        assert!(free.total_units <= low.total_units);
        assert!(low.total_units <= high.total_units);
        assert!(free.total_usd <= low.total_usd);
        assert!(low.total_usd <= high.total_usd);
    }

    #[test]
    fn script_units_scale_with_tier_pace() {
        let batch = vec![spec(CostTier::Free, OperationParams::script(30).unwrap())];
        let est = estimator();
        assert!(
            est.estimate(&batch, CostTier::High).total_units
                > est.estimate(&batch, CostTier::Free).total_units
        );
    }

    #[test]
    fn per_stage_covers_every_operation_in_the_batch() {
        let batch = vec![
            spec(CostTier::Free, OperationParams::script(30).unwrap()),
            spec(CostTier::Free, OperationParams::titles(3).unwrap()),
            spec(
                CostTier::Free,
                OperationParams::narration("some narration text", "alloy").unwrap(),
            ),
            spec(CostTier::Free, OperationParams::images("broll", 15).unwrap()),
        ];
        let estimate = estimator().estimate(&batch, CostTier::High);

        assert_eq!(estimate.per_stage.len(), 4);
        assert_eq!(
            estimate.total_units,
            estimate.per_stage.values().sum::<u64>()
        );
        assert!(estimate.total_usd > 0.0);
    }

    #[test]
    fn image_units_equal_requested_count() {
        let batch = vec![spec(
            CostTier::Free,
            OperationParams::images("broll", 15).unwrap(),
        )];
        let estimate = estimator().estimate(&batch, CostTier::Free);
        assert_eq!(estimate.per_stage[&Operation::Images], 15);
    }

    #[test]
    fn default_table_validates() {
        assert!(PricingTable::default().validate().is_ok());
    }

    #[test]
    fn decreasing_tier_prices_are_rejected() {
        let mut table = PricingTable::default();
        table.low.output_usd_per_1k_tokens = table.high.output_usd_per_1k_tokens * 2.0;
        let err = table.validate().unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[test]
    fn negative_prices_are_rejected() {
        let mut table = PricingTable::default();
        table.free.input_usd_per_1k_tokens = -0.1;
        assert!(table.validate().is_err());
    }

    #[test]
    fn blank_model_is_rejected() {
        let mut table = PricingTable::default();
        table.high.model = "  ".to_string();
        assert!(table.validate().is_err());
    }

    #[test]
    fn plan_batch_covers_every_stage_of_a_full_run() {
        let specs = plan_batch(
            &ChannelId::parse("finance").unwrap(),
            &ThemeText::parse("index funds").unwrap(),
            1,
            CostTier::Free,
            OutputKind::Both,
            ShortsCount::default(),
            30,
            15,
            "alloy",
        )
        .unwrap();

        let operations: Vec<Operation> = specs.iter().map(RequestSpec::operation).collect();
        assert_eq!(
            operations,
            vec![
                Operation::Script,
                Operation::Titles,
                Operation::Narration,
                Operation::Images,
                Operation::ShortsExtraction,
            ]
        );
    }

    #[test]
    fn plan_batch_for_shorts_only_has_one_stage() {
        let specs = plan_batch(
            &ChannelId::parse("finance").unwrap(),
            &ThemeText::parse("index funds").unwrap(),
            1,
            CostTier::Free,
            OutputKind::Shorts,
            ShortsCount::default(),
            30,
            15,
            "alloy",
        )
        .unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].operation(), Operation::ShortsExtraction);
    }

    #[test]
    fn estimate_serializes_with_string_stage_keys() {
        let estimate = estimator().estimate(&shorts_batch(2), CostTier::Free);
        let json = serde_json::to_string(&estimate).unwrap();
        assert!(json.contains("\"shorts_extraction\""));
        assert!(json.contains("total_units"));
    }
}

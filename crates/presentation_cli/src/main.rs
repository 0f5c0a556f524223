//! Clipforge CLI
//!
//! Drives the generation coordinator in-process: a long run is the staged
//! sequence script -> titles -> narration -> images, shorts extraction feeds
//! on the script, and dry-run routes the same planned batch to the estimator
//! without touching cache or providers.

#![allow(clippy::print_stdout)]

use std::sync::Arc;

use anyhow::{Context as _, bail};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use application::ports::{ArtifactStorePort, Capability, Namespace};
use application::services::{
    CostEstimator, ExecuteOptions, GenerationService, plan_batch,
};
use domain::{
    ChannelId, CostTier, ImageAsset, NarrationAudio, OperationParams, OutputKind, RequestSpec,
    ScriptDraft, ShortClip, ShortsCount, ThemeText, TitleSet,
};
use infrastructure::{AppConfig, AppContext, MemoryArtifactStore, RedbArtifactStore};

/// Generate long-form and short-form media scripts
#[derive(Parser, Debug)]
#[command(name = "clipforge", version, about)]
struct Cli {
    /// Content channel
    #[arg(long, default_value = "devotional")]
    channel: String,

    /// What to generate: long | shorts | both
    #[arg(long, default_value = "both")]
    output: String,

    /// Cost tier: free | low | high
    #[arg(long = "cost-tier", default_value = "free")]
    cost_tier: String,

    /// Theme/topic (channel default applies when omitted)
    #[arg(long)]
    theme: Option<String>,

    /// Production week, part of the cache identity
    #[arg(long, default_value_t = 0)]
    week: u32,

    /// Number of shorts to extract (1-8)
    #[arg(long = "num-shorts", default_value_t = 4)]
    num_shorts: u8,

    /// Estimate cost without calling any provider
    #[arg(long)]
    dry_run: bool,

    /// Bypass cache read and write for this invocation
    #[arg(long)]
    no_cache: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Clear cached artifacts and exit; pass a namespace to scope the clear
    #[arg(long, value_name = "NAMESPACE", num_args = 0..=1, default_missing_value = "all")]
    clear_cache: Option<String>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(
            cli.verbose,
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("{e}"))?;

    if let Some(scope) = &cli.clear_cache {
        return clear_cache(&config, scope).await;
    }

    let tier: CostTier = cli.cost_tier.parse().map_err(|e| anyhow::anyhow!("{e}"))?;
    let output: OutputKind = cli.output.parse().map_err(|e| anyhow::anyhow!("{e}"))?;
    let channel = ChannelId::parse(&cli.channel).map_err(|e| anyhow::anyhow!("{e}"))?;
    let theme = ThemeText::parse(
        cli.theme
            .as_deref()
            .unwrap_or(&config.generation.default_theme),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    let num_shorts = ShortsCount::parse(cli.num_shorts).map_err(|e| anyhow::anyhow!("{e}"))?;

    if cli.dry_run {
        // Pure estimation: no credentials, no cache, no network
        return dry_run(&config, &channel, &theme, &cli, tier, output, num_shorts);
    }

    if output == OutputKind::Shorts {
        bail!("shorts need a long-form script to extract from; use --output both");
    }

    let context = AppContext::from_config(&config).context("startup failed")?;
    let options = if cli.no_cache {
        ExecuteOptions::no_cache()
    } else {
        ExecuteOptions::default()
    };

    let result = run_pipeline(
        &context, &config, &channel, &theme, &cli, tier, output, num_shorts, options,
    )
    .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result.to_json())?);
    } else {
        result.print_summary();
    }

    Ok(())
}

/// Clear cached artifacts, optionally scoped to one namespace
async fn clear_cache(config: &AppConfig, scope: &str) -> anyhow::Result<()> {
    let namespace = match scope {
        "all" => None,
        other => Some(
            Namespace::parse(other)
                .with_context(|| format!("unknown cache namespace '{other}'"))?,
        ),
    };

    let store: Arc<dyn ArtifactStorePort> = if config.cache.enabled {
        Arc::new(
            RedbArtifactStore::new(config.cache.artifact_db_path())
                .map_err(|e| anyhow::anyhow!("{e}"))?,
        )
    } else {
        Arc::new(MemoryArtifactStore::new())
    };

    let removed = store
        .clear(namespace)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("Removed {removed} cached artifact(s)");
    Ok(())
}

/// Estimate the planned run and print the breakdown
fn dry_run(
    config: &AppConfig,
    channel: &ChannelId,
    theme: &ThemeText,
    cli: &Cli,
    tier: CostTier,
    output: OutputKind,
    num_shorts: ShortsCount,
) -> anyhow::Result<()> {
    config.pricing.validate().map_err(|e| anyhow::anyhow!("{e}"))?;

    let specs = plan_batch(
        channel,
        theme,
        cli.week,
        tier,
        output,
        num_shorts,
        config.generation.duration_minutes,
        config.generation.images_per_video,
        &config.providers.speech.voice,
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    let estimator = CostEstimator::new(config.pricing.clone());
    let estimate = estimator.estimate(&specs, tier);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    println!("DRY RUN - cost estimate");
    println!("  Channel    : {channel}");
    println!("  Theme      : {theme}");
    println!("  Tier       : {tier}");
    println!("  Output     : {output}");
    for (operation, units) in &estimate.per_stage {
        println!("  {:<10} : {units} units", operation.tag());
    }
    println!("  Total units: {}", estimate.total_units);
    println!("  Est. cost  : ${:.5}", estimate.total_usd);
    Ok(())
}

/// Collected artifacts of one run
#[derive(Debug, Default)]
struct RunResult {
    script: Option<(ScriptDraft, bool)>,
    titles: Option<(TitleSet, bool)>,
    narration: Option<(NarrationAudio, bool)>,
    images: Option<(Vec<ImageAsset>, bool)>,
    shorts: Option<(Vec<ShortClip>, bool)>,
}

impl RunResult {
    fn to_json(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        if let Some((script, cached)) = &self.script {
            out.insert("long_script".to_string(), serde_json::json!(script));
            out.insert("long_script_cached".to_string(), serde_json::json!(cached));
        }
        if let Some((titles, _)) = &self.titles {
            out.insert("titles".to_string(), serde_json::json!(titles.titles));
            out.insert(
                "thumbnail_texts".to_string(),
                serde_json::json!(titles.thumbnails),
            );
        }
        if let Some((narration, _)) = &self.narration {
            out.insert(
                "narration".to_string(),
                serde_json::json!({
                    "media_type": narration.media_type,
                    "bytes": narration.len(),
                }),
            );
        }
        if let Some((images, _)) = &self.images {
            out.insert("images".to_string(), serde_json::json!(images));
        }
        if let Some((shorts, _)) = &self.shorts {
            out.insert("shorts".to_string(), serde_json::json!(shorts));
        }
        serde_json::Value::Object(out)
    }

    fn print_summary(&self) {
        if let Some((script, cached)) = &self.script {
            println!(
                "Long-form : {} segments, {} words{}",
                script.segments.len(),
                script.word_count(),
                if *cached { " (from cache)" } else { "" }
            );
        }
        if let Some((titles, _)) = &self.titles {
            if let Some(best) = titles.titles.first() {
                println!("Title     : {best}");
            }
        }
        if let Some((narration, cached)) = &self.narration {
            println!(
                "Narration : {} ({} KiB){}",
                narration.media_type,
                narration.len() / 1024,
                if *cached { " (from cache)" } else { "" }
            );
        }
        if let Some((images, _)) = &self.images {
            println!("Images    : {} assets", images.len());
        }
        if let Some((shorts, _)) = &self.shorts {
            println!("Shorts    : {} scripts", shorts.len());
        }
    }
}

/// Execute the staged pipeline; each stage is an independent cache entry
#[allow(clippy::too_many_arguments)]
async fn run_pipeline(
    context: &AppContext,
    config: &AppConfig,
    channel: &ChannelId,
    theme: &ThemeText,
    cli: &Cli,
    tier: CostTier,
    output: OutputKind,
    num_shorts: ShortsCount,
    options: ExecuteOptions,
) -> anyhow::Result<RunResult> {
    let generation: &Arc<GenerationService> = &context.generation;
    let make = |params: OperationParams| {
        RequestSpec::new(channel.clone(), theme.clone(), cli.week, tier, params)
    };

    let mut result = RunResult::default();

    let script_spec = make(
        OperationParams::script(config.generation.duration_minutes)
            .map_err(|e| anyhow::anyhow!("{e}"))?,
    );
    let generated = generation.execute(&script_spec, options).await?;
    let draft: ScriptDraft = generated
        .artifact
        .decode_payload()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let script_cached = generated.cache_hit;

    if output.includes_long() {
        let titles_spec = make(
            OperationParams::titles(OperationParams::DEFAULT_TITLE_OPTIONS)
                .map_err(|e| anyhow::anyhow!("{e}"))?,
        );
        let generated = generation.execute(&titles_spec, options).await?;
        let titles: TitleSet = generated
            .artifact
            .decode_payload()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        result.titles = Some((titles, generated.cache_hit));

        if generation.supports(Capability::SpeechSynthesis) {
            let narration_spec = make(
                OperationParams::narration(&draft.full_text, &config.providers.speech.voice)
                    .map_err(|e| anyhow::anyhow!("{e}"))?,
            );
            let generated = generation.execute(&narration_spec, options).await?;
            let narration: NarrationAudio = generated
                .artifact
                .decode_payload()
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            result.narration = Some((narration, generated.cache_hit));
        }

        if generation.supports(Capability::ImageSearch) && config.generation.images_per_video > 0
        {
            let images_spec = make(
                OperationParams::images(theme.as_str(), config.generation.images_per_video)
                    .map_err(|e| anyhow::anyhow!("{e}"))?,
            );
            let generated = generation.execute(&images_spec, options).await?;
            let images: Vec<ImageAsset> = generated
                .artifact
                .decode_payload()
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            result.images = Some((images, generated.cache_hit));
        }
    }

    if output.includes_shorts() {
        let shorts_spec = make(
            OperationParams::shorts_extraction(&draft.full_text, num_shorts)
                .map_err(|e| anyhow::anyhow!("{e}"))?,
        );
        let generated = generation.execute(&shorts_spec, options).await?;
        let shorts: Vec<ShortClip> = generated
            .artifact
            .decode_payload()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        result.shorts = Some((shorts, generated.cache_hit));
    }

    result.script = Some((draft, script_cached));

    Ok(result)
}

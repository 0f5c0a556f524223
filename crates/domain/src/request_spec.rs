//! Request specification: one immutable unit of generation work

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::fingerprint::Fingerprint;
use crate::value_objects::{ChannelId, ShortsCount, ThemeText};

/// Cost/quality profile selecting which models and unit prices apply
///
/// Ordered: `Free < Low < High`. Estimates must be non-decreasing along this
/// order for an otherwise identical request.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    /// Cheapest models, free TTS
    #[default]
    Free,
    /// Mid-range models, optional paid TTS
    Low,
    /// Flagship models and paid TTS/imagery
    High,
}

impl CostTier {
    /// Canonical tag used in fingerprints and config keys
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Low => "low",
            Self::High => "high",
        }
    }

    /// All tiers in ascending cost order
    pub const ALL: [Self; 3] = [Self::Free, Self::Low, Self::High];

    /// Approximate narration pace for this tier, in words per minute
    pub const fn narration_words_per_minute(self) -> u32 {
        match self {
            Self::Free => 130,
            Self::Low => 140,
            Self::High => 150,
        }
    }
}

impl std::fmt::Display for CostTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for CostTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            other => Err(DomainError::InvalidCostTier(other.to_string())),
        }
    }
}

/// What a run should produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Long-form script only
    Long,
    /// Short-form clips only
    Shorts,
    /// Long-form script plus shorts
    #[default]
    Both,
}

impl OutputKind {
    /// Whether a long-form script stage is part of this output
    pub const fn includes_long(self) -> bool {
        matches!(self, Self::Long | Self::Both)
    }

    /// Whether a shorts-extraction stage is part of this output
    pub const fn includes_shorts(self) -> bool {
        matches!(self, Self::Shorts | Self::Both)
    }
}

impl std::str::FromStr for OutputKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" => Ok(Self::Long),
            "shorts" => Ok(Self::Shorts),
            "both" => Ok(Self::Both),
            other => Err(DomainError::InvalidOutputKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Shorts => write!(f, "shorts"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// The kind of generation a spec requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Long-form script generation
    Script,
    /// Title and thumbnail-text options
    Titles,
    /// Short-form clip extraction from an existing script
    ShortsExtraction,
    /// Narration audio synthesis
    Narration,
    /// Stock image lookup
    Images,
}

impl Operation {
    /// All operations
    pub const ALL: [Self; 5] = [
        Self::Script,
        Self::Titles,
        Self::ShortsExtraction,
        Self::Narration,
        Self::Images,
    ];

    /// Canonical tag used in fingerprints and cache namespaces
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Titles => "titles",
            Self::ShortsExtraction => "shorts",
            Self::Narration => "narration",
            Self::Images => "images",
        }
    }

    /// Parse an operation from its canonical tag
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tag() == tag)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Operation-specific parameters
///
/// Free-text inputs are trimmed at construction; everything that can change
/// provider output is part of the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OperationParams {
    /// Long-form script of roughly `duration_minutes` of narration
    Script { duration_minutes: u32 },
    /// `options` title candidates plus as many thumbnail texts
    Titles { options: u8 },
    /// Extract `num_shorts` clips from `source_script`
    ShortsExtraction {
        source_script: String,
        num_shorts: ShortsCount,
    },
    /// Synthesize narration audio for `source_text`
    Narration { source_text: String, voice: String },
    /// Look up `count` stock images for `query`
    Images { query: String, count: u8 },
}

impl OperationParams {
    /// Default number of title/thumbnail options
    pub const DEFAULT_TITLE_OPTIONS: u8 = 3;
    /// Upper bound on stock images per request
    pub const MAX_IMAGES: u8 = 40;

    /// Script parameters
    pub fn script(duration_minutes: u32) -> Result<Self, DomainError> {
        if duration_minutes == 0 {
            return Err(DomainError::validation("duration_minutes must be positive"));
        }
        Ok(Self::Script { duration_minutes })
    }

    /// Title parameters
    pub fn titles(options: u8) -> Result<Self, DomainError> {
        if !(1..=10).contains(&options) {
            return Err(DomainError::validation(
                "title options must be between 1 and 10",
            ));
        }
        Ok(Self::Titles { options })
    }

    /// Shorts-extraction parameters
    pub fn shorts_extraction(
        source_script: impl AsRef<str>,
        num_shorts: ShortsCount,
    ) -> Result<Self, DomainError> {
        let source_script = source_script.as_ref().trim().to_string();
        if source_script.is_empty() {
            return Err(DomainError::validation(
                "cannot extract shorts from an empty script",
            ));
        }
        Ok(Self::ShortsExtraction {
            source_script,
            num_shorts,
        })
    }

    /// Narration parameters
    pub fn narration(
        source_text: impl AsRef<str>,
        voice: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let source_text = source_text.as_ref().trim().to_string();
        if source_text.is_empty() {
            return Err(DomainError::validation("cannot narrate empty text"));
        }
        Ok(Self::Narration {
            source_text,
            voice: voice.into(),
        })
    }

    /// Image-lookup parameters
    pub fn images(query: impl AsRef<str>, count: u8) -> Result<Self, DomainError> {
        if !(1..=Self::MAX_IMAGES).contains(&count) {
            return Err(DomainError::validation(format!(
                "image count must be between 1 and {}",
                Self::MAX_IMAGES
            )));
        }
        let query = query.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
        if query.is_empty() {
            return Err(DomainError::validation("image query must not be empty"));
        }
        Ok(Self::Images { query, count })
    }

    /// The operation these parameters describe
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Script { .. } => Operation::Script,
            Self::Titles { .. } => Operation::Titles,
            Self::ShortsExtraction { .. } => Operation::ShortsExtraction,
            Self::Narration { .. } => Operation::Narration,
            Self::Images { .. } => Operation::Images,
        }
    }
}

/// Immutable description of one unit of generation work
///
/// Two specs that are semantically identical fingerprint identically; any
/// parameter change yields a different fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    channel: ChannelId,
    theme: ThemeText,
    week: u32,
    tier: CostTier,
    params: OperationParams,
}

impl RequestSpec {
    /// Assemble a spec from already-validated parts
    pub fn new(
        channel: ChannelId,
        theme: ThemeText,
        week: u32,
        tier: CostTier,
        params: OperationParams,
    ) -> Self {
        Self {
            channel,
            theme,
            week,
            tier,
            params,
        }
    }

    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    pub fn theme(&self) -> &ThemeText {
        &self.theme
    }

    pub const fn week(&self) -> u32 {
        self.week
    }

    pub const fn tier(&self) -> CostTier {
        self.tier
    }

    pub const fn params(&self) -> &OperationParams {
        &self.params
    }

    pub const fn operation(&self) -> Operation {
        self.params.operation()
    }

    /// Deterministic digest of the normalized spec
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }
}

//! Channel identifier value object

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Identifier of a content channel (e.g. "devotional", "finance")
///
/// Lowercased and trimmed at construction so that two spellings of the same
/// channel fingerprint identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Maximum accepted length in characters
    pub const MAX_LEN: usize = 64;

    /// Parse a channel identifier, normalizing case and surrounding whitespace
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let normalized = raw.as_ref().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(DomainError::InvalidChannel(
                "channel must not be empty".to_string(),
            ));
        }
        if normalized.chars().count() > Self::MAX_LEN {
            return Err(DomainError::InvalidChannel(format!(
                "channel exceeds {} characters",
                Self::MAX_LEN
            )));
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidChannel(
                "channel may only contain alphanumerics, '-' and '_'".to_string(),
            ));
        }

        Ok(Self(normalized))
    }

    /// The normalized identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let id = ChannelId::parse("  Devotional ").unwrap();
        assert_eq!(id.as_str(), "devotional");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(ChannelId::parse("   ").is_err());
    }

    #[test]
    fn parse_rejects_invalid_characters() {
        assert!(ChannelId::parse("my channel!").is_err());
    }

    #[test]
    fn parse_accepts_dashes_and_underscores() {
        assert!(ChannelId::parse("finance_ai-saas").is_ok());
    }

    #[test]
    fn parse_rejects_overlong() {
        let raw = "a".repeat(ChannelId::MAX_LEN + 1);
        assert!(ChannelId::parse(raw).is_err());
    }

    #[test]
    fn equal_spellings_compare_equal() {
        let a = ChannelId::parse("Devotional").unwrap();
        let b = ChannelId::parse("devotional  ").unwrap();
        assert_eq!(a, b);
    }
}

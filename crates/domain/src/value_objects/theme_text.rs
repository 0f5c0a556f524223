//! Theme text value object

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Free-form topic/theme for a generation run
///
/// Normalization collapses runs of whitespace and trims the ends, so specs
/// that differ only in incidental formatting produce the same fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeText(String);

impl ThemeText {
    /// Maximum accepted length in characters
    pub const MAX_LEN: usize = 500;

    /// Parse and normalize theme text
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let normalized = raw.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.is_empty() {
            return Err(DomainError::InvalidTheme(
                "theme must not be empty".to_string(),
            ));
        }
        if normalized.chars().count() > Self::MAX_LEN {
            return Err(DomainError::InvalidTheme(format!(
                "theme exceeds {} characters",
                Self::MAX_LEN
            )));
        }

        Ok(Self(normalized))
    }

    /// The normalized text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters of the normalized text
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl std::fmt::Display for ThemeText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Shorts count value object

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Number of short-form clips to extract from a long-form script
///
/// Bounded 1..=8; extraction prompts degrade badly past that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortsCount(u8);

impl ShortsCount {
    /// Minimum number of shorts per run
    pub const MIN: u8 = 1;
    /// Maximum number of shorts per run
    pub const MAX: u8 = 8;

    /// Parse a shorts count, rejecting values outside 1..=8
    pub fn parse(raw: u8) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(DomainError::validation(format!(
                "num_shorts must be between {} and {}, got {raw}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// The validated count
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for ShortsCount {
    /// Four shorts per long-form script
    fn default() -> Self {
        Self(4)
    }
}

impl std::fmt::Display for ShortsCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_bounds() {
        assert!(ShortsCount::parse(1).is_ok());
        assert!(ShortsCount::parse(8).is_ok());
    }

    #[test]
    fn parse_rejects_zero_and_nine() {
        assert!(ShortsCount::parse(0).is_err());
        assert!(ShortsCount::parse(9).is_err());
    }

    #[test]
    fn default_is_four() {
        assert_eq!(ShortsCount::default().get(), 4);
    }
}

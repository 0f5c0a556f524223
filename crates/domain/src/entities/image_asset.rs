//! Stock image reference

use serde::{Deserialize, Serialize};

/// Reference to one stock image usable as b-roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Direct URL of the image file
    pub url: String,
    /// Alt text / description supplied by the provider
    #[serde(default)]
    pub alt: String,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
}

impl ImageAsset {
    /// Whether the image is landscape-oriented (usable for 16:9 composition)
    pub const fn is_landscape(&self) -> bool {
        self.width >= self.height
    }
}

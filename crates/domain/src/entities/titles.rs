//! Title and thumbnail-text options

use serde::{Deserialize, Serialize};

/// Candidate titles and thumbnail texts for one video
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleSet {
    /// Title candidates, best-first as the model emitted them
    pub titles: Vec<String>,
    /// Thumbnail text candidates
    pub thumbnails: Vec<String>,
}

impl TitleSet {
    /// Whether the set carries at least one usable title
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty() && self.thumbnails.is_empty()
    }
}

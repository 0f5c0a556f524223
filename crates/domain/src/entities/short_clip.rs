//! Short-form clip artifact

use serde::{Deserialize, Serialize};

/// One short-form vertical clip extracted from a long-form script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortClip {
    /// Clip title
    pub title: String,
    /// Attention hook, first one or two sentences
    pub hook: String,
    /// Full narration script for the clip
    pub script: String,
    /// Social caption
    pub caption: String,
    /// Hashtags, `#`-prefixed
    pub hashtags: Vec<String>,
}

impl ShortClip {
    /// A clip is usable once it has a title or a script body
    pub fn is_usable(&self) -> bool {
        !self.title.is_empty() || !self.script.is_empty()
    }
}

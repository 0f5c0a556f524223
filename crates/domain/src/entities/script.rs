//! Long-form script artifact

use serde::{Deserialize, Serialize};

/// One titled section of a long-form script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSegment {
    /// Segment heading
    pub title: String,
    /// Narration text for this segment
    pub content: String,
}

/// A generated long-form script, structured into segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDraft {
    /// Theme the script was generated for
    pub theme: String,
    /// Ordered segments
    pub segments: Vec<ScriptSegment>,
    /// All segment content joined for narration and extraction
    pub full_text: String,
}

impl ScriptDraft {
    /// Build a draft from parsed segments, deriving the joined text
    pub fn from_segments(theme: impl Into<String>, segments: Vec<ScriptSegment>) -> Self {
        let full_text = segments
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        Self {
            theme: theme.into(),
            segments,
            full_text,
        }
    }

    /// Word count of the joined narration text
    pub fn word_count(&self) -> usize {
        self.full_text.split_whitespace().count()
    }
}

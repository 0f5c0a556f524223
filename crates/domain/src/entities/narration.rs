//! Narration audio artifact

use serde::{Deserialize, Serialize};

/// Synthesized narration audio
///
/// Audio bytes travel base64-encoded inside the JSON payload so the artifact
/// stays a single self-contained cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationAudio {
    /// MIME type of the audio, e.g. `audio/mpeg`
    pub media_type: String,
    /// Raw audio bytes
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl NarrationAudio {
    /// Size of the audio payload in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

mod base64_bytes {
    use base64::Engine as _;
    use serde::Deserialize as _;

    pub fn serialize<S: serde::Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(de)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

//! Deterministic request fingerprints
//!
//! A fingerprint is a blake3 digest over the canonical component sequence of
//! a normalized [`RequestSpec`]. Components are fed in a fixed order with a
//! separator octet between them so that adjacent fields cannot collide.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::request_spec::{OperationParams, RequestSpec};

/// Schema tag mixed into every digest; bump when the component layout changes
const SCHEMA_TAG: &str = "v1";

/// Fixed-length digest identifying a normalized request
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Compute the fingerprint of a spec
    pub fn of(spec: &RequestSpec) -> Self {
        let mut hasher = blake3::Hasher::new();
        for component in components(spec) {
            hasher.update(component.as_bytes());
            hasher.update(b"|"); // Separator to avoid collisions
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Raw digest bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering, used as the storage key
    pub fn to_hex(&self) -> String {
        let mut hex = String::with_capacity(64);
        for byte in self.0 {
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

/// Canonical component sequence: schema, operation, shared fields, then
/// operation parameters in declaration order
fn components(spec: &RequestSpec) -> Vec<String> {
    let mut parts = vec![
        SCHEMA_TAG.to_string(),
        spec.operation().tag().to_string(),
        spec.channel().as_str().to_string(),
        spec.theme().as_str().to_string(),
        spec.week().to_string(),
        spec.tier().tag().to_string(),
    ];

    match spec.params() {
        OperationParams::Script { duration_minutes } => {
            parts.push(duration_minutes.to_string());
        }
        OperationParams::Titles { options } => {
            parts.push(options.to_string());
        }
        OperationParams::ShortsExtraction {
            source_script,
            num_shorts,
        } => {
            parts.push(source_script.clone());
            parts.push(num_shorts.to_string());
        }
        OperationParams::Narration {
            source_text,
            voice,
        } => {
            parts.push(source_text.clone());
            parts.push(voice.clone());
        }
        OperationParams::Images { query, count } => {
            parts.push(query.clone());
            parts.push(count.to_string());
        }
    }

    parts
}

//! Domain layer for Clipforge
//!
//! Pure request/artifact model with no I/O: request specifications, their
//! deterministic fingerprints, the typed artifacts that generation produces,
//! and the validation rules that keep both honest.

pub mod entities;
pub mod errors;
pub mod fingerprint;
pub mod request_spec;
pub mod value_objects;

pub use entities::{
    ImageAsset, NarrationAudio, ScriptDraft, ScriptSegment, ShortClip, TitleSet,
};
pub use errors::DomainError;
pub use fingerprint::Fingerprint;
pub use request_spec::{CostTier, Operation, OperationParams, OutputKind, RequestSpec};
pub use value_objects::{ChannelId, ShortsCount, ThemeText};

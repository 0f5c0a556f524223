//! Provider adapters
//!
//! Bridge the backend clients to the application's [`ProviderPort`], mapping
//! client errors onto the failure kinds the fallback chain advances on.

mod image_provider;
mod speech_provider;
mod text_provider;

pub use image_provider::ImageProviderAdapter;
pub use speech_provider::SpeechProviderAdapter;
pub use text_provider::TextProviderAdapter;

use ai_backends::BackendError;
use application::ports::FailureKind;

/// Map a backend error to the chain's failure taxonomy
///
/// 429 advances the chain as quota exhaustion, timeouts advance as timeouts,
/// transport and server errors advance as unavailability, and a malformed
/// request stops the chain — another provider cannot fix the caller's input.
pub(crate) fn failure_kind(error: &BackendError) -> FailureKind {
    match error {
        BackendError::QuotaExceeded(_) => FailureKind::QuotaExceeded,
        BackendError::Timeout(_) => FailureKind::Timeout,
        BackendError::InvalidRequest(_) => FailureKind::InvalidInput,
        BackendError::ConnectionFailed(_)
        | BackendError::RequestFailed(_)
        | BackendError::ServerError { .. }
        | BackendError::InvalidResponse(_) => FailureKind::Unavailable,
    }
}

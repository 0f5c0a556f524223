//! Typed views of generated artifacts

mod image_asset;
mod narration;
mod script;
mod short_clip;
mod titles;

pub use image_asset::ImageAsset;
pub use narration::NarrationAudio;
pub use script::{ScriptDraft, ScriptSegment};
pub use short_clip::ShortClip;
pub use titles::TitleSet;

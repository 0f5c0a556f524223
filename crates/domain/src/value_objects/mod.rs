//! Validated value objects used throughout the request model

mod channel_id;
mod shorts_count;
mod theme_text;

pub use channel_id::ChannelId;
pub use shorts_count::ShortsCount;
pub use theme_text::ThemeText;

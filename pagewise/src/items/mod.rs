//! Item model: typed records describing discovered content.
//!
//! Items are immutable value objects produced fresh per extraction call.
//! The variant is an explicit `info_type` tag so validation can dispatch on
//! it directly.

mod info_item;
mod upload_date;

pub use info_item::{
    ChannelDetails, InfoItem, InfoType, ItemKind, PlaylistDetails, StreamDetails, StreamType,
};
pub use upload_date::{DateParseError, UploadDate};

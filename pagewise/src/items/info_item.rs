//! Typed records for discovered content.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::upload_date::UploadDate;

/// The content type of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoType {
    /// A single playable stream.
    Stream,
    /// A channel / uploader.
    Channel,
    /// A playlist of streams.
    Playlist,
}

impl fmt::Display for InfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream => write!(f, "stream"),
            Self::Channel => write!(f, "channel"),
            Self::Playlist => write!(f, "playlist"),
        }
    }
}

/// What kind of stream a stream item points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    /// Type not reported by the backend.
    #[default]
    None,
    /// A regular video.
    VideoStream,
    /// Audio only content.
    AudioStream,
    /// A live video broadcast.
    LiveStream,
    /// A live audio broadcast.
    AudioLiveStream,
    /// A recording of a finished live broadcast.
    PostLiveStream,
}

/// Fields specific to stream items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamDetails {
    /// Display name of the uploader.
    #[serde(default)]
    pub uploader_name: String,
    /// Channel URL of the uploader.
    #[serde(default)]
    pub uploader_url: String,
    /// Whether the uploader is verified by the service.
    #[serde(default)]
    pub uploader_verified: bool,
    /// Kind of stream.
    #[serde(default)]
    pub stream_type: StreamType,
    /// Duration in seconds, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    /// View count, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    /// Upload date as displayed by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textual_upload_date: Option<String>,
    /// Parsed upload date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<UploadDate>,
    /// Short description snippet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
}

impl StreamDetails {
    /// Creates stream details for a regular video.
    #[must_use]
    pub fn new(uploader_name: impl Into<String>, uploader_url: impl Into<String>) -> Self {
        Self {
            uploader_name: uploader_name.into(),
            uploader_url: uploader_url.into(),
            stream_type: StreamType::VideoStream,
            ..Default::default()
        }
    }

    /// Sets the textual and parsed upload date.
    #[must_use]
    pub fn with_upload_date(
        mut self,
        textual: impl Into<String>,
        parsed: Option<UploadDate>,
    ) -> Self {
        self.textual_upload_date = Some(textual.into());
        self.upload_date = parsed;
        self
    }

    /// Sets the duration.
    #[must_use]
    pub fn with_duration(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// Sets the view count.
    #[must_use]
    pub fn with_view_count(mut self, views: u64) -> Self {
        self.view_count = Some(views);
        self
    }

    /// Sets the stream type.
    #[must_use]
    pub fn with_stream_type(mut self, stream_type: StreamType) -> Self {
        self.stream_type = stream_type;
        self
    }
}

/// Fields specific to channel items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelDetails {
    /// Channel description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Subscriber count, if public.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_count: Option<u64>,
    /// Number of uploaded streams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_count: Option<u64>,
    /// Whether the channel is verified.
    #[serde(default)]
    pub verified: bool,
}

/// Fields specific to playlist items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaylistDetails {
    /// Playlist owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader_name: Option<String>,
    /// Number of streams in the playlist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_count: Option<u64>,
}

/// Variant-specific part of an item, tagged by `info_type`.
///
/// A missing or unrecognised tag deserialises to [`ItemKind::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "info_type", rename_all = "snake_case")]
pub enum ItemKind {
    /// A stream item.
    Stream(StreamDetails),
    /// A channel item.
    Channel(ChannelDetails),
    /// A playlist item.
    Playlist(PlaylistDetails),
    /// The backend did not set a type this crate understands.
    Unknown,
}

impl<'de> Deserialize<'de> for ItemKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let tag = fields.remove("info_type");
        let details = Value::Object(fields);
        match tag.as_ref().and_then(Value::as_str) {
            Some("stream") => serde_json::from_value(details).map(Self::Stream),
            Some("channel") => serde_json::from_value(details).map(Self::Channel),
            Some("playlist") => serde_json::from_value(details).map(Self::Playlist),
            _ => return Ok(Self::Unknown),
        }
        .map_err(de::Error::custom)
    }
}

impl ItemKind {
    /// The discriminant, or `None` when the type is unset.
    #[must_use]
    pub fn info_type(&self) -> Option<InfoType> {
        match self {
            Self::Stream(_) => Some(InfoType::Stream),
            Self::Channel(_) => Some(InfoType::Channel),
            Self::Playlist(_) => Some(InfoType::Playlist),
            Self::Unknown => None,
        }
    }
}

/// One discovered content record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoItem {
    /// Id of the service that produced the item.
    pub service_id: u32,
    /// Canonical URL of the item.
    pub url: String,
    /// Display name.
    pub name: String,
    /// Thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Variant-specific fields.
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl InfoItem {
    /// Creates a stream item.
    #[must_use]
    pub fn stream(
        service_id: u32,
        url: impl Into<String>,
        name: impl Into<String>,
        details: StreamDetails,
    ) -> Self {
        Self::with_kind(service_id, url, name, ItemKind::Stream(details))
    }

    /// Creates a channel item.
    #[must_use]
    pub fn channel(
        service_id: u32,
        url: impl Into<String>,
        name: impl Into<String>,
        details: ChannelDetails,
    ) -> Self {
        Self::with_kind(service_id, url, name, ItemKind::Channel(details))
    }

    /// Creates a playlist item.
    #[must_use]
    pub fn playlist(
        service_id: u32,
        url: impl Into<String>,
        name: impl Into<String>,
        details: PlaylistDetails,
    ) -> Self {
        Self::with_kind(service_id, url, name, ItemKind::Playlist(details))
    }

    /// Creates an item from an explicit kind.
    #[must_use]
    pub fn with_kind(
        service_id: u32,
        url: impl Into<String>,
        name: impl Into<String>,
        kind: ItemKind,
    ) -> Self {
        Self {
            service_id,
            url: url.into(),
            name: name.into(),
            thumbnail_url: None,
            kind,
        }
    }

    /// Sets the thumbnail URL.
    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// The item's type, or `None` when unset.
    #[must_use]
    pub fn info_type(&self) -> Option<InfoType> {
        self.kind.info_type()
    }

    /// Stream fields, if this is a stream item.
    #[must_use]
    pub fn as_stream(&self) -> Option<&StreamDetails> {
        match &self.kind {
            ItemKind::Stream(details) => Some(details),
            _ => None,
        }
    }

    /// Returns true for channel items.
    #[must_use]
    pub fn is_channel(&self) -> bool {
        matches!(self.kind, ItemKind::Channel(_))
    }

    /// Returns true for stream items.
    #[must_use]
    pub fn is_stream(&self) -> bool {
        matches!(self.kind, ItemKind::Stream(_))
    }
}

impl AsRef<InfoItem> for InfoItem {
    fn as_ref(&self) -> &InfoItem {
        self
    }
}

impl fmt::Display for InfoItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self
            .info_type()
            .map_or_else(|| "unknown".to_string(), |t| t.to_string());
        write!(f, "{kind} \"{}\" <{}>", self.name, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_stream() -> InfoItem {
        InfoItem::stream(
            0,
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "A video",
            StreamDetails::new("Uploader", "https://www.youtube.com/channel/UC0000000000000000000000")
                .with_duration(212)
                .with_view_count(1_000),
        )
        .with_thumbnail("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
    }

    #[test]
    fn test_info_type_follows_tag() {
        assert_eq!(sample_stream().info_type(), Some(InfoType::Stream));
        let channel = InfoItem::channel(0, "https://x", "c", ChannelDetails::default());
        assert!(channel.is_channel());
        assert_eq!(ItemKind::Unknown.info_type(), None);
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let json = serde_json::to_value(sample_stream()).unwrap();
        assert_eq!(json["info_type"], "stream");
        assert_eq!(json["uploader_name"], "Uploader");
        assert_eq!(json["stream_type"], "video_stream");
        assert_eq!(json["service_id"], 0);
    }

    #[test]
    fn test_unrecognised_tag_is_unknown() {
        let json = serde_json::json!({
            "service_id": 3,
            "url": "https://example.com/c/1",
            "name": "A comment",
            "info_type": "comment",
        });
        let item: InfoItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.kind, ItemKind::Unknown);
        assert_eq!(item.info_type(), None);
    }

    #[test]
    fn test_missing_tag_is_unknown() {
        let json = serde_json::json!({
            "service_id": 0,
            "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "name": "No tag",
        });
        let item: InfoItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.kind, ItemKind::Unknown);
        assert_eq!(item.info_type(), None);

        let untyped = serde_json::json!({
            "service_id": 0,
            "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "name": "Null tag",
            "info_type": null,
        });
        let item: InfoItem = serde_json::from_value(untyped).unwrap();
        assert_eq!(item.kind, ItemKind::Unknown);
    }

    #[test]
    fn test_tagged_item_round_trips() {
        let json = serde_json::to_value(sample_stream()).unwrap();
        let item: InfoItem = serde_json::from_value(json).unwrap();
        assert_eq!(item, sample_stream());
    }

    #[test]
    fn test_malformed_details_rejected() {
        let json = serde_json::json!({
            "service_id": 0,
            "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "name": "Bad",
            "info_type": "stream",
            "view_count": "many",
        });
        assert!(serde_json::from_value::<InfoItem>(json).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample_stream().to_string(),
            "stream \"A video\" <https://www.youtube.com/watch?v=dQw4w9WgXcQ>"
        );
    }
}

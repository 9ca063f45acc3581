//! Fixtures: a video-site service and a sample search catalogue.

use chrono::{Duration, Utc};

use crate::config::ServiceConfig;
use crate::errors::ConfigError;
use crate::items::{
    ChannelDetails, InfoItem, PlaylistDetails, StreamDetails, StreamType, UploadDate,
};
use crate::linking::ServiceDescriptor;

/// Id of the fixture video service.
pub const VIDEO_SERVICE_ID: u32 = 0;

/// Channel the sample search is expected to surface near the top.
pub const PEWDIEPIE_CHANNEL_URL: &str = "https://www.youtube.com/channel/UC-lHJZR3Gqxm24_Vd_AJ5Yw";

/// Number of entries in [`sample_search_catalogue`].
pub const SAMPLE_CATALOGUE_LEN: usize = 47;

const PLAYLIST_POSITION: usize = 10;

/// Config for a YouTube-like service.
#[must_use]
pub fn video_service_config() -> ServiceConfig {
    ServiceConfig::new(VIDEO_SERVICE_ID, "YouTube")
        .with_host("youtube.com")
        .with_host("youtu.be")
        .with_stream_pattern(r"^/watch\?(.*&)?v=[\w-]{11}")
        .with_channel_pattern(r"^/(channel/UC[\w-]{22}|user/[\w.-]+|c/[\w.-]+)/?$")
        .with_playlist_pattern(r"^/playlist\?(.*&)?list=[\w-]+")
}

/// Descriptor for the YouTube-like service.
pub fn video_service() -> Result<ServiceDescriptor, ConfigError> {
    video_service_config().build()
}

/// Canonical watch URL for a video id.
#[must_use]
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// A stream uploaded `days_ago` days ago by `uploader_url`.
#[must_use]
pub fn stream_item(video_id: &str, title: &str, uploader_url: &str, days_ago: i64) -> InfoItem {
    let uploaded = Utc::now() - Duration::days(days_ago);
    InfoItem::stream(
        VIDEO_SERVICE_ID,
        watch_url(video_id),
        title,
        StreamDetails::new("PewDiePie", uploader_url)
            .with_upload_date(
                format!("{days_ago} days ago"),
                Some(UploadDate::approximate(uploaded)),
            )
            .with_duration(600)
            .with_view_count(1_000_000)
            .with_stream_type(StreamType::VideoStream),
    )
    .with_thumbnail(format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg"))
}

/// A channel item.
#[must_use]
pub fn channel_item(url: &str, name: &str) -> InfoItem {
    InfoItem::channel(
        VIDEO_SERVICE_ID,
        url,
        name,
        ChannelDetails {
            subscriber_count: Some(111_000_000),
            verified: true,
            ..ChannelDetails::default()
        },
    )
    .with_thumbnail("https://yt3.ggpht.com/a/default-user=s88")
}

/// A playlist item.
#[must_use]
pub fn playlist_item(list_id: &str, name: &str) -> InfoItem {
    InfoItem::playlist(
        VIDEO_SERVICE_ID,
        format!("https://www.youtube.com/playlist?list={list_id}"),
        name,
        PlaylistDetails {
            uploader_name: Some("PewDiePie".to_string()),
            stream_count: Some(42),
        },
    )
}

/// Ranked search results for `query`: the matching channel first, a
/// playlist at position 10 and streams everywhere else.
#[must_use]
pub fn sample_search_catalogue(query: &str) -> Vec<InfoItem> {
    (0..SAMPLE_CATALOGUE_LEN)
        .map(|position| match position {
            0 => channel_item(PEWDIEPIE_CHANNEL_URL, "PewDiePie"),
            PLAYLIST_POSITION => playlist_item("PLYH8WvNV1YEn_tQ1RV8vVK2Cd8ZkAfwt4", "Best of"),
            n => stream_item(
                &format!("pwdp{n:07}"),
                &format!("{query} video {n}"),
                PEWDIEPIE_CHANNEL_URL,
                i64::try_from(n).unwrap_or_default() + 1,
            ),
        })
        .collect()
}

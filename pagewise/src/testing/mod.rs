//! Testing utilities for backends and drivers.
//!
//! This module provides:
//! - A YouTube-like service descriptor and item builders
//! - An in-memory search backend with self-contained cursors
//! - Assertions over validation results

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_failed_with, assert_valid_page, assert_violation};
pub use fixtures::{
    channel_item, playlist_item, sample_search_catalogue, stream_item, video_service,
    video_service_config, watch_url, PEWDIEPIE_CHANNEL_URL, SAMPLE_CATALOGUE_LEN,
    VIDEO_SERVICE_ID,
};
pub use mocks::{CatalogueSource, FailingSource};

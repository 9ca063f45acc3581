//! # Pagewise
//!
//! A paginated metadata-extraction contract for content backends.
//!
//! Backends for different content services expose lists of typed items
//! (streams, channels, playlists) through one protocol:
//!
//! - **Item model**: tagged records with per-variant details
//! - **Link classification**: each service decides what its URLs point at
//! - **Cursor pagination**: opaque, transferable cursors between pages
//! - **Partial failures**: per-item errors are collected, not fatal
//! - **Validation**: an ordered rule chain every page must pass
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewise::prelude::*;
//!
//! let mut extractor = Paginated::new(MySearchSource::new(service, "query"));
//!
//! // Fetch and validate the first page, then follow the cursor
//! let first = default_test_related_items(&mut extractor).await?;
//! let second = default_test_more_items(&mut extractor).await?;
//! assert_pages_differ(&first, &second)?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod collector;
pub mod config;
pub mod conformance;
pub mod errors;
pub mod items;
pub mod linking;
pub mod observability;
pub mod paging;
pub mod testing;
pub mod validation;

pub use errors::{PagewiseError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collector::{ErrorTolerance, ItemsCollector};
    pub use crate::config::{PagewiseConfig, ServiceConfig};
    pub use crate::conformance::{
        assert_no_more_items, assert_pages_differ, default_test_get_page_in_new_extractor,
        default_test_more_items, default_test_related_items, ConformanceSuite,
    };
    pub use crate::errors::{
        ClassificationError, ConfigError, ExtractionError, InvalidCursorError, ItemBuildError,
        PagewiseError, ValidationError, ValidationErrorKind,
    };
    pub use crate::items::{
        ChannelDetails, InfoItem, InfoType, ItemKind, PlaylistDetails, StreamDetails, StreamType,
        UploadDate,
    };
    pub use crate::linking::{
        FnClassifier, LinkClassifier, LinkType, PatternClassifier, ServiceDescriptor,
        ServiceRegistry,
    };
    pub use crate::observability::{init_tracing, TracingConfig};
    pub use crate::paging::{Cursor, ListExtractor, Page, PageSource, Paginated};
    pub use crate::validation::{ValidationConfig, ValidationEngine, ValidationResult};
}

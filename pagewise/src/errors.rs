//! Error types for the pagewise extraction contract.
//!
//! Item-level failures ([`ItemBuildError`]) are collected into a page and
//! never abort it. Page-level failures ([`ExtractionError`]) always propagate.
//! Validation failures ([`ValidationError`]) are fail-fast and carry the
//! offending item for diagnosis.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::linking::LinkType;

/// Convenience result alias using [`PagewiseError`].
pub type Result<T, E = PagewiseError> = std::result::Result<T, E>;

/// The main error type for pagewise operations.
#[derive(Debug, Error)]
pub enum PagewiseError {
    /// A page failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A whole page fetch failed.
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    /// A page was requested without a usable cursor.
    #[error("{0}")]
    InvalidCursor(#[from] InvalidCursorError),

    /// A link classifier hit an internal fault.
    #[error("{0}")]
    Classification(#[from] ClassificationError),

    /// Configuration could not be loaded or applied.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl PagewiseError {
    /// Returns the validation error, if this is one.
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// Errors raised by a backend's link classifier.
///
/// Distinct from a URL that is simply not recognised, which classifies as
/// [`LinkType::None`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// The URL matched rules for more than one link type.
    #[error("Ambiguous link \"{url}\": matches {}", format_link_types(candidates))]
    Ambiguous {
        /// The classified URL.
        url: String,
        /// Link types whose rules matched.
        candidates: Vec<LinkType>,
    },

    /// The URL could not be decomposed by the backend.
    #[error("Could not decompose link \"{url}\": {reason}")]
    Decomposition {
        /// The classified URL.
        url: String,
        /// What went wrong.
        reason: String,
    },
}

impl ClassificationError {
    /// Creates an ambiguity error.
    #[must_use]
    pub fn ambiguous(url: impl Into<String>, candidates: Vec<LinkType>) -> Self {
        Self::Ambiguous {
            url: url.into(),
            candidates,
        }
    }

    /// Creates a decomposition error.
    #[must_use]
    pub fn decomposition(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decomposition {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

fn format_link_types(types: &[LinkType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single item failed to build. Collected into a page, never fatal to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}{message}", format_item_prefix(.index, .field))]
pub struct ItemBuildError {
    /// Human readable cause.
    pub message: String,
    /// Position of the raw entry in the backend's listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Field that could not be extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ItemBuildError {
    /// Creates a new item build error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            index: None,
            field: None,
        }
    }

    /// Creates an error for a field the backend could not extract.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("could not extract {field}"),
            index: None,
            field: Some(field),
        }
    }

    /// Sets the entry index.
    #[must_use]
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

fn format_item_prefix(index: &Option<usize>, field: &Option<String>) -> String {
    match (index, field) {
        (Some(i), Some(f)) => format!("item #{i} ({f}): "),
        (Some(i), None) => format!("item #{i}: "),
        (None, Some(f)) => format!("({f}): "),
        (None, None) => String::new(),
    }
}

/// A whole page fetch failed. No partial page is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The backend could not retrieve the page.
    #[error("Fetch failed for {url}: {reason}")]
    Fetch {
        /// Request URL.
        url: String,
        /// Failure cause.
        reason: String,
    },

    /// The backend retrieved the page but could not understand it.
    #[error("Could not parse page {url}: {reason}")]
    Parse {
        /// Request URL.
        url: String,
        /// Failure cause.
        reason: String,
    },

    /// The backend rejected a continuation cursor.
    #[error("Invalid continuation \"{cursor}\": {reason}")]
    InvalidContinuation {
        /// The rejected cursor.
        cursor: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The backend does not support the requested listing.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl ExtractionError {
    /// Creates a fetch error.
    #[must_use]
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid continuation error.
    #[must_use]
    pub fn invalid_continuation(cursor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidContinuation {
            cursor: cursor.into(),
            reason: reason.into(),
        }
    }
}

/// A page was requested with an absent or empty cursor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Extractor '{extractor}' asked for a page without a cursor: {reason}")]
pub struct InvalidCursorError {
    /// Extractor id.
    pub extractor: String,
    /// Whether the cursor was absent or empty.
    pub reason: String,
}

impl InvalidCursorError {
    /// The cursor was present but empty.
    #[must_use]
    pub fn empty(extractor: impl Into<String>) -> Self {
        Self {
            extractor: extractor.into(),
            reason: "cursor is empty".to_string(),
        }
    }

    /// No cursor was available.
    #[must_use]
    pub fn absent(extractor: impl Into<String>) -> Self {
        Self {
            extractor: extractor.into(),
            reason: "no next page cursor".to_string(),
        }
    }
}

/// The kinds of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// The item list was empty.
    EmptyList,
    /// The item list contained a null entry.
    NullItem,
    /// A URL was not https.
    InsecureUrl,
    /// A required field was empty or absent.
    MissingField,
    /// A URL classified as the wrong link type.
    WrongLinkType,
    /// An upload date was not in the past.
    FutureUploadDate,
    /// An item came from a different service.
    ServiceIdMismatch,
    /// The page carried item errors the caller did not allow.
    UnexpectedErrors,
    /// Cursor and next-page state disagree.
    CursorInvariantViolation,
}

impl ValidationErrorKind {
    /// Stable diagnostic code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyList => "PAGE-001-EMPTY",
            Self::NullItem => "PAGE-002-NULL_ITEM",
            Self::InsecureUrl => "ITEM-001-INSECURE_URL",
            Self::MissingField => "ITEM-002-MISSING_FIELD",
            Self::WrongLinkType => "ITEM-003-LINK_TYPE",
            Self::FutureUploadDate => "ITEM-004-FUTURE_DATE",
            Self::ServiceIdMismatch => "ITEM-005-SERVICE_ID",
            Self::UnexpectedErrors => "PAGE-003-ERRORS",
            Self::CursorInvariantViolation => "PAGE-004-CURSOR",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyList => write!(f, "empty_list"),
            Self::NullItem => write!(f, "null_item"),
            Self::InsecureUrl => write!(f, "insecure_url"),
            Self::MissingField => write!(f, "missing_field"),
            Self::WrongLinkType => write!(f, "wrong_link_type"),
            Self::FutureUploadDate => write!(f, "future_upload_date"),
            Self::ServiceIdMismatch => write!(f, "service_id_mismatch"),
            Self::UnexpectedErrors => write!(f, "unexpected_errors"),
            Self::CursorInvariantViolation => write!(f, "cursor_invariant_violation"),
        }
    }
}

/// Error raised by the validation engine. Always the first violation found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", format_location(.index, .item_name, .item_url))]
pub struct ValidationError {
    /// What kind of rule was violated.
    pub kind: ValidationErrorKind,
    /// The error message.
    pub message: String,
    /// Index of the offending item.
    pub index: Option<usize>,
    /// Name of the offending item.
    pub item_name: Option<String>,
    /// URL of the offending item.
    pub item_url: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            index: None,
            item_name: None,
            item_url: None,
        }
    }

    /// Attaches the offending item's position, name and url.
    #[must_use]
    pub fn for_item(mut self, index: usize, name: &str, url: &str) -> Self {
        self.index = Some(index);
        self.item_name = Some(name.to_string());
        self.item_url = Some(url.to_string());
        self
    }

    /// Attaches only the offending position.
    #[must_use]
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Stable diagnostic code for the error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("kind".to_string(), serde_json::json!(self.kind));
        map.insert("code".to_string(), serde_json::json!(self.code()));
        map.insert("message".to_string(), serde_json::json!(self.message));
        if let Some(index) = self.index {
            map.insert("index".to_string(), serde_json::json!(index));
        }
        if let Some(ref name) = self.item_name {
            map.insert("item_name".to_string(), serde_json::json!(name));
        }
        if let Some(ref url) = self.item_url {
            map.insert("item_url".to_string(), serde_json::json!(url));
        }
        map
    }
}

fn format_location(
    index: &Option<usize>,
    name: &Option<String>,
    url: &Option<String>,
) -> String {
    match (index, name, url) {
        (Some(i), Some(n), Some(u)) => format!(" [item #{i} \"{n}\" <{u}>]"),
        (Some(i), _, _) => format!(" [item #{i}]"),
        _ => String::new(),
    }
}

/// Configuration could not be loaded or applied.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config document was not valid JSON for the expected shape.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A URL pattern did not compile.
    #[error("Invalid pattern '{pattern}' for service '{service}': {source}")]
    InvalidPattern {
        /// Service name.
        service: String,
        /// The offending pattern.
        pattern: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },

    /// A service declared no hosts.
    #[error("Service '{0}' declares no hosts")]
    NoHosts(String),

    /// Two services share an id.
    #[error("Service id {0} is already registered")]
    DuplicateService(u32),

    /// The tracing subscriber could not be installed.
    #[error("Tracing setup failed: {0}")]
    Tracing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_includes_item() {
        let err = ValidationError::new(ValidationErrorKind::InsecureUrl, "Url is not https")
            .for_item(3, "Some video", "http://example.com/watch?v=1");

        let text = err.to_string();
        assert!(text.starts_with("Url is not https"));
        assert!(text.contains("item #3"));
        assert!(text.contains("\"Some video\""));
        assert!(text.contains("<http://example.com/watch?v=1>"));
    }

    #[test]
    fn test_validation_error_display_without_item() {
        let err = ValidationError::new(ValidationErrorKind::EmptyList, "List of items is empty");
        assert_eq!(err.to_string(), "List of items is empty");
    }

    #[test]
    fn test_validation_error_to_dict() {
        let err = ValidationError::new(ValidationErrorKind::NullItem, "null").at(2);
        let dict = err.to_dict();

        assert_eq!(dict.get("kind").unwrap(), "null_item");
        assert_eq!(dict.get("code").unwrap(), "PAGE-002-NULL_ITEM");
        assert_eq!(dict.get("index").unwrap(), 2);
        assert!(!dict.contains_key("item_url"));
    }

    #[test]
    fn test_item_build_error_display() {
        let err = ItemBuildError::missing_field("uploader_url").at(7);
        assert_eq!(err.to_string(), "item #7 (uploader_url): could not extract uploader_url");

        let bare = ItemBuildError::new("bad entry");
        assert_eq!(bare.to_string(), "bad entry");
    }

    #[test]
    fn test_classification_error_lists_candidates() {
        let err = ClassificationError::ambiguous(
            "https://example.com/x",
            vec![LinkType::Stream, LinkType::Playlist],
        );
        assert!(err.to_string().contains("stream, playlist"));
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: PagewiseError = InvalidCursorError::empty("search").into();
        assert!(matches!(err, PagewiseError::InvalidCursor(_)));
        assert!(err.as_validation().is_none());
    }
}

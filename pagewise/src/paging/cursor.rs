//! Opaque pagination cursor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token telling a backend where to resume.
///
/// The core never looks inside a cursor; it only checks emptiness and
/// equality. Backends must encode all continuation state into it so any
/// extractor instance can resume from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wraps a backend token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the token is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the cursor, returning the raw token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Returns true when the cursor is present and non-empty.
#[must_use]
pub fn is_usable(cursor: Option<&Cursor>) -> bool {
    cursor.is_some_and(|c| !c.is_empty())
}

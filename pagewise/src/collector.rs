//! Partial-failure accumulation while a backend builds a page.
//!
//! One malformed entry in a list of fifty must not sink the other forty-nine:
//! item builders run through [`ItemsCollector::commit`], failures land in the
//! page's error list, and the page is returned with whatever did build.

use serde::{Deserialize, Serialize};

use crate::errors::ItemBuildError;
use crate::paging::{Cursor, Page};

/// How many item errors a caller accepts on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "count")]
pub enum ErrorTolerance {
    /// No item errors allowed (default).
    #[default]
    None,
    /// Exactly this many item errors expected.
    Exactly(usize),
    /// Up to this many item errors allowed.
    AtMost(usize),
    /// Any number of item errors allowed.
    Any,
}

impl ErrorTolerance {
    /// Returns true if a page with `count` item errors is acceptable.
    #[must_use]
    pub fn permits(self, count: usize) -> bool {
        match self {
            Self::None => count == 0,
            Self::Exactly(expected) => count == expected,
            Self::AtMost(max) => count <= max,
            Self::Any => true,
        }
    }
}

/// Collects built items and per-item failures for one page.
#[derive(Debug)]
pub struct ItemsCollector<T> {
    service_id: u32,
    items: Vec<T>,
    errors: Vec<ItemBuildError>,
    seen: usize,
}

impl<T> ItemsCollector<T> {
    /// Creates a collector for a service's items.
    #[must_use]
    pub fn new(service_id: u32) -> Self {
        Self {
            service_id,
            items: Vec::new(),
            errors: Vec::new(),
            seen: 0,
        }
    }

    /// Service id item builders should stamp on their items.
    #[must_use]
    pub fn service_id(&self) -> u32 {
        self.service_id
    }

    /// Runs one item builder. A failure is recorded with the entry's index
    /// instead of being returned.
    pub fn commit<F>(&mut self, build: F)
    where
        F: FnOnce() -> Result<T, ItemBuildError>,
    {
        let index = self.seen;
        self.seen += 1;
        match build() {
            Ok(item) => self.items.push(item),
            Err(err) => {
                let err = if err.index.is_none() { err.at(index) } else { err };
                tracing::debug!(index, error = %err, "Item build failed");
                self.errors.push(err);
            }
        }
    }

    /// Records a failure that did not come from a builder.
    pub fn add_error(&mut self, error: ItemBuildError) {
        self.errors.push(error);
    }

    /// Items built so far.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Failures recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[ItemBuildError] {
        &self.errors
    }

    /// Number of builders committed, successful or not.
    #[must_use]
    pub fn committed(&self) -> usize {
        self.seen
    }

    /// Finishes the page.
    #[must_use]
    pub fn into_page(self, next_cursor: Option<Cursor>) -> Page<T> {
        Page::new(self.items, self.errors, next_cursor)
    }
}

//! Protocol traits for paginated listings.
//!
//! [`PageSource`] is what a backend implements: two stateless fetch hooks.
//! [`ListExtractor`] is what drivers and the conformance checks consume:
//! the stateful initial-page / next-page view over a source.

use async_trait::async_trait;

use super::cursor::{is_usable, Cursor};
use super::page::Page;
use crate::errors::{ExtractionError, InvalidCursorError, Result};
use crate::linking::ServiceDescriptor;

/// Backend contract for one listing (a search, a channel's uploads, ...).
///
/// Fetch hooks take `&self`: continuation state has to travel in the cursor,
/// which is what makes cursors transferable between instances.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Item type produced by this listing.
    type Item: Send + Sync;

    /// The owning service.
    fn service(&self) -> &ServiceDescriptor;

    /// Listing id (for searches, the query).
    fn id(&self) -> &str;

    /// Listing display name. Defaults to the id.
    fn name(&self) -> &str {
        self.id()
    }

    /// The request URL of the listing.
    fn url(&self) -> &str;

    /// Query correction offered by the service ("did you mean").
    /// Empty when there is none.
    fn search_suggestion(&self) -> &str {
        ""
    }

    /// Fetches the first page.
    async fn fetch_initial_page(&self) -> Result<Page<Self::Item>, ExtractionError>;

    /// Fetches the page a cursor points at.
    async fn fetch_page(&self, cursor: &Cursor) -> Result<Page<Self::Item>, ExtractionError>;
}

/// Driver-facing paginated list.
#[async_trait]
pub trait ListExtractor: Send + Sync {
    /// Item type produced by this listing.
    type Item: Send + Sync;

    /// The owning service.
    fn service(&self) -> &ServiceDescriptor;

    /// Listing id.
    fn id(&self) -> &str;

    /// Listing display name.
    fn name(&self) -> &str;

    /// The request URL of the listing.
    fn url(&self) -> &str;

    /// Query correction offered by the service. Empty when there is none.
    fn search_suggestion(&self) -> &str {
        ""
    }

    /// Fetches the first page.
    async fn initial_page(&mut self) -> Result<Page<Self::Item>>;

    /// Fetches the page a cursor points at. Works on a fresh instance with
    /// a cursor obtained from another one.
    async fn page(&mut self, cursor: &Cursor) -> Result<Page<Self::Item>>;

    /// Cursor returned with the most recent page.
    fn next_cursor(&self) -> Option<&Cursor>;

    /// True iff the most recent cursor is present and non-empty.
    fn has_next_page(&self) -> bool {
        is_usable(self.next_cursor())
    }

    /// Fetches the page after the most recent one.
    async fn next_page(&mut self) -> Result<Page<Self::Item>> {
        let cursor = self
            .next_cursor()
            .cloned()
            .ok_or_else(|| InvalidCursorError::absent(self.id()))?;
        self.page(&cursor).await
    }
}

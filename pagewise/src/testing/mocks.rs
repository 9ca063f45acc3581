//! In-memory page sources for driving the protocol without a network.

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::time::Duration;

use super::fixtures::sample_search_catalogue;
use crate::collector::ItemsCollector;
use crate::errors::{ExtractionError, ItemBuildError};
use crate::items::InfoItem;
use crate::linking::ServiceDescriptor;
use crate::paging::{Cursor, Page, PageSource};
use crate::validation::query_param;

const SEARCH_ENDPOINT: &str = "https://www.youtube.com/results";
const DEFAULT_PAGE_SIZE: usize = 20;

/// Continuation state carried inside a cursor.
#[derive(Debug, Serialize, Deserialize)]
struct Continuation {
    query: String,
    offset: usize,
}

/// A search listing served from an in-memory catalogue.
///
/// Cursors are self-contained search URLs: the `continuation` and `ctoken`
/// parameters carry the same base64 token and `itct` carries a sha256 tag
/// over it, so any instance for the same query can resume from them.
#[derive(Debug)]
pub struct CatalogueSource {
    service: ServiceDescriptor,
    query: String,
    country: String,
    url: String,
    suggestion: String,
    entries: Vec<InfoItem>,
    page_size: usize,
    broken: BTreeSet<usize>,
    repeat_pages: bool,
    latency: Option<Duration>,
    fetch_count: Mutex<usize>,
}

impl CatalogueSource {
    /// A search for `query` over [`sample_search_catalogue`].
    #[must_use]
    pub fn search(service: ServiceDescriptor, query: impl Into<String>) -> Self {
        let query = query.into();
        let entries = sample_search_catalogue(&query);
        Self::new(service, query, entries)
    }

    /// A search for `query` over the given entries.
    #[must_use]
    pub fn new(service: ServiceDescriptor, query: impl Into<String>, entries: Vec<InfoItem>) -> Self {
        let query = query.into();
        let country = "GB".to_string();
        Self {
            url: search_url(&query, &country),
            service,
            query,
            country,
            suggestion: String::new(),
            entries,
            page_size: DEFAULT_PAGE_SIZE,
            broken: BTreeSet::new(),
            repeat_pages: false,
            latency: None,
            fetch_count: Mutex::new(0),
        }
    }

    /// Sets the content country.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self.url = search_url(&self.query, &self.country);
        self
    }

    /// Sets the "did you mean" suggestion served with the listing.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    /// Sets the number of entries per page (at least one).
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Makes the entry at `index` fail to build.
    #[must_use]
    pub fn with_broken_entry(mut self, index: usize) -> Self {
        self.broken.insert(index);
        self
    }

    /// Serves the first page's entries for every page while cursors still
    /// advance.
    #[must_use]
    pub fn repeating_pages(mut self) -> Self {
        self.repeat_pages = true;
        self
    }

    /// Delays every fetch.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fetches served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        *self.fetch_count.lock()
    }

    /// The search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    async fn page_at(&self, offset: usize) -> Result<Page<InfoItem>, ExtractionError> {
        *self.fetch_count.lock() += 1;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let total = self.entries.len();
        let start = if self.repeat_pages { 0 } else { offset };
        let mut collector = ItemsCollector::new(self.service.id());
        for index in start..(start + self.page_size).min(total) {
            collector.commit(|| {
                if self.broken.contains(&index) {
                    Err(ItemBuildError::missing_field("uploader_url").at(index))
                } else {
                    Ok(self.entries[index].clone())
                }
            });
        }

        let next = offset + self.page_size;
        let cursor = if next < total {
            Some(self.cursor_for(next)?)
        } else {
            None
        };
        Ok(collector.into_page(cursor))
    }

    fn cursor_for(&self, offset: usize) -> Result<Cursor, ExtractionError> {
        let payload = serde_json::to_vec(&Continuation {
            query: self.query.clone(),
            offset,
        })
        .map_err(|e| ExtractionError::parse(&self.url, e.to_string()))?;
        let token = URL_SAFE_NO_PAD.encode(payload);
        let tag = integrity_tag(&token);
        Ok(Cursor::new(format!(
            "{}&continuation={token}&ctoken={token}&itct={tag}",
            self.url
        )))
    }

    fn offset_of(&self, cursor: &Cursor) -> Result<usize, ExtractionError> {
        let raw = cursor.as_str();
        let token = query_param(raw, "continuation")
            .ok_or_else(|| invalid(cursor, "missing continuation parameter"))?;
        if query_param(raw, "ctoken").as_deref() != Some(token.as_str()) {
            return Err(invalid(cursor, "ctoken does not match continuation"));
        }
        if query_param(raw, "itct").as_deref() != Some(integrity_tag(&token).as_str()) {
            return Err(invalid(cursor, "integrity tag mismatch"));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|e| invalid(cursor, e.to_string()))?;
        let continuation: Continuation =
            serde_json::from_slice(&payload).map_err(|e| invalid(cursor, e.to_string()))?;
        if continuation.query != self.query {
            return Err(invalid(
                cursor,
                format!("continuation belongs to query \"{}\"", continuation.query),
            ));
        }
        if continuation.offset >= self.entries.len() {
            return Err(invalid(cursor, "offset past the end of the listing"));
        }
        Ok(continuation.offset)
    }
}

#[async_trait]
impl PageSource for CatalogueSource {
    type Item = InfoItem;

    fn service(&self) -> &ServiceDescriptor {
        &self.service
    }

    fn id(&self) -> &str {
        &self.query
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn search_suggestion(&self) -> &str {
        &self.suggestion
    }

    async fn fetch_initial_page(&self) -> Result<Page<InfoItem>, ExtractionError> {
        self.page_at(0).await
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<Page<InfoItem>, ExtractionError> {
        let offset = self.offset_of(cursor)?;
        self.page_at(offset).await
    }
}

/// A source whose every fetch fails.
#[derive(Debug)]
pub struct FailingSource {
    service: ServiceDescriptor,
    url: String,
    reason: String,
}

impl FailingSource {
    /// Creates a failing source.
    #[must_use]
    pub fn new(service: ServiceDescriptor, url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            service,
            url: url.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PageSource for FailingSource {
    type Item = InfoItem;

    fn service(&self) -> &ServiceDescriptor {
        &self.service
    }

    fn id(&self) -> &str {
        "failing"
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_initial_page(&self) -> Result<Page<InfoItem>, ExtractionError> {
        Err(ExtractionError::fetch(&self.url, &self.reason))
    }

    async fn fetch_page(&self, _cursor: &Cursor) -> Result<Page<InfoItem>, ExtractionError> {
        Err(ExtractionError::fetch(&self.url, &self.reason))
    }
}

fn search_url(query: &str, country: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{SEARCH_ENDPOINT}?search_query={encoded}&gl={country}")
}

fn integrity_tag(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"continuation:");
    hasher.update(token.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

fn invalid(cursor: &Cursor, reason: impl Into<String>) -> ExtractionError {
    ExtractionError::invalid_continuation(cursor.as_str(), reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::video_service;

    fn source() -> CatalogueSource {
        CatalogueSource::search(video_service().unwrap(), "pewdiepie")
    }

    #[test]
    fn test_search_url() {
        assert_eq!(
            source().url(),
            "https://www.youtube.com/results?search_query=pewdiepie&gl=GB"
        );
        let other = CatalogueSource::search(video_service().unwrap(), "lofi beats").with_country("DE");
        assert_eq!(
            other.url(),
            "https://www.youtube.com/results?search_query=lofi+beats&gl=DE"
        );
    }

    #[tokio::test]
    async fn test_pages_follow_cursors() {
        let source = source();
        let first = source.fetch_initial_page().await.unwrap();
        assert_eq!(first.len(), 20);

        let second = source.fetch_page(first.next_cursor().unwrap()).await.unwrap();
        assert_eq!(second.items()[0].url, source.entries[20].url);

        let last = source.fetch_page(second.next_cursor().unwrap()).await.unwrap();
        assert_eq!(last.len(), 7);
        assert!(last.next_cursor().is_none());
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_broken_entries_become_errors() {
        let source = source().with_broken_entry(3).with_broken_entry(25);
        let first = source.fetch_initial_page().await.unwrap();
        assert_eq!(first.len(), 19);
        assert_eq!(first.errors().len(), 1);
        assert_eq!(first.errors()[0].index, Some(3));
    }

    #[tokio::test]
    async fn test_tampered_cursor_rejected() {
        let source = source();
        let first = source.fetch_initial_page().await.unwrap();
        let cursor = first.next_cursor().unwrap().as_str();

        let tampered = Cursor::new(cursor.replace("itct=", "itct=00"));
        let err = source.fetch_page(&tampered).await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidContinuation { .. }));

        let missing = Cursor::new(SEARCH_ENDPOINT);
        assert!(source.fetch_page(&missing).await.is_err());
    }

    #[tokio::test]
    async fn test_cursor_from_other_query_rejected() {
        let first = source().fetch_initial_page().await.unwrap();
        let other = CatalogueSource::search(video_service().unwrap(), "markiplier");
        let err = other.fetch_page(first.next_cursor().unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("pewdiepie"));
    }

    #[tokio::test]
    async fn test_failing_source() {
        let source = FailingSource::new(video_service().unwrap(), "https://example.com/x", "timed out");
        let err = source.fetch_initial_page().await.unwrap_err();
        assert_eq!(err, ExtractionError::fetch("https://example.com/x", "timed out"));
        assert_eq!(source.name(), "failing");
    }
}

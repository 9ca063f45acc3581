//! Pagination state machine over a [`PageSource`].

use async_trait::async_trait;
use futures::stream::{self, Stream};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::cursor::Cursor;
use super::page::Page;
use super::protocol::{ListExtractor, PageSource};
use crate::errors::{InvalidCursorError, PagewiseError, Result};
use crate::linking::ServiceDescriptor;

/// Where a paginated listing currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaginationState {
    /// Nothing fetched yet.
    #[default]
    Unstarted,
    /// A page was fetched; holds the cursor it returned.
    HasPage {
        /// Cursor returned with the latest page.
        cursor: Option<Cursor>,
    },
}

impl PaginationState {
    /// Returns true once a page has been fetched and no cursor remains.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        match self {
            Self::Unstarted => false,
            Self::HasPage { cursor } => !super::cursor::is_usable(cursor.as_ref()),
        }
    }
}

/// A [`ListExtractor`] driving a backend [`PageSource`].
///
/// Each instance gets its own id for log correlation. The id is never put
/// into cursors.
#[derive(Debug)]
pub struct Paginated<S: PageSource> {
    source: S,
    state: PaginationState,
    instance_id: Uuid,
}

impl<S: PageSource> Paginated<S> {
    /// Wraps a page source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: PaginationState::Unstarted,
            instance_id: Uuid::new_v4(),
        }
    }

    /// The wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current state.
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Id used to correlate this instance's log lines.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    fn record(&mut self, page: &Page<S::Item>, started: Instant, kind: &'static str) {
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        info!(
            service_id = self.source.service().id(),
            extractor = %self.source.id(),
            instance = %self.instance_id,
            page = kind,
            item_count = page.len(),
            error_count = page.errors().len(),
            has_next = page.has_next_page(),
            duration_ms,
            "Fetched page"
        );
        if !page.errors().is_empty() {
            warn!(
                extractor = %self.source.id(),
                error_count = page.errors().len(),
                first_error = %page.errors()[0],
                "Page carries item errors"
            );
        }
        self.state = PaginationState::HasPage {
            cursor: page.next_cursor().cloned(),
        };
    }
}

impl<S> Paginated<S>
where
    S: PageSource + 'static,
    S::Item: 'static,
{
    /// Streams pages starting from the initial one, stopping after
    /// `max_pages` pages or when no cursor remains.
    pub fn into_pages(self, max_pages: usize) -> impl Stream<Item = Result<Page<S::Item>>> + Send {
        stream::try_unfold((self, 0_usize), move |(mut extractor, fetched)| async move {
            if fetched >= max_pages {
                return Ok::<_, PagewiseError>(None);
            }
            let page = if fetched == 0 {
                extractor.initial_page().await?
            } else if extractor.has_next_page() {
                extractor.next_page().await?
            } else {
                return Ok(None);
            };
            Ok(Some((page, (extractor, fetched + 1))))
        })
    }
}

#[async_trait]
impl<S: PageSource> ListExtractor for Paginated<S> {
    type Item = S::Item;

    fn service(&self) -> &ServiceDescriptor {
        self.source.service()
    }

    fn id(&self) -> &str {
        self.source.id()
    }

    fn name(&self) -> &str {
        self.source.name()
    }

    fn url(&self) -> &str {
        self.source.url()
    }

    fn search_suggestion(&self) -> &str {
        self.source.search_suggestion()
    }

    async fn initial_page(&mut self) -> Result<Page<Self::Item>> {
        debug!(extractor = %self.source.id(), url = %self.source.url(), "Fetching initial page");
        let started = Instant::now();
        let page = self.source.fetch_initial_page().await.map_err(|err| {
            warn!(extractor = %self.source.id(), error = %err, "Initial page fetch failed");
            err
        })?;
        self.record(&page, started, "initial");
        Ok(page)
    }

    async fn page(&mut self, cursor: &Cursor) -> Result<Page<Self::Item>> {
        if cursor.is_empty() {
            return Err(InvalidCursorError::empty(self.source.id()).into());
        }
        debug!(extractor = %self.source.id(), instance = %self.instance_id, "Fetching page by cursor");
        let started = Instant::now();
        let page = self.source.fetch_page(cursor).await.map_err(|err| {
            warn!(extractor = %self.source.id(), error = %err, "Page fetch failed");
            err
        })?;
        self.record(&page, started, "continuation");
        Ok(page)
    }

    fn next_cursor(&self) -> Option<&Cursor> {
        match &self.state {
            PaginationState::Unstarted => None,
            PaginationState::HasPage { cursor } => cursor.as_ref(),
        }
    }
}

//! Conformance checks every backend listing must pass.
//!
//! [`ConformanceSuite`] drives a [`ListExtractor`] through its pages and
//! validates each one. The free functions run the same checks with the
//! default validation policy.


use tracing::info;

use crate::errors::{InvalidCursorError, Result, ValidationError, ValidationErrorKind};
use crate::items::InfoItem;
use crate::paging::{is_usable, ListExtractor, Page};
use crate::validation::{ValidationConfig, ValidationEngine};

/// A validation engine plus the cross-page checks built on it.
#[derive(Debug, Clone, Default)]
pub struct ConformanceSuite {
    engine: ValidationEngine,
}

impl ConformanceSuite {
    /// Creates a suite around an engine.
    #[must_use]
    pub fn new(engine: ValidationEngine) -> Self {
        Self { engine }
    }

    /// Creates a suite from a validation policy.
    #[must_use]
    pub fn with_config(config: ValidationConfig) -> Self {
        Self::new(ValidationEngine::new(config))
    }

    /// The suite's engine.
    #[must_use]
    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// Fetches the initial page and validates it.
    pub async fn related_items<E>(&self, extractor: &mut E) -> Result<Page<E::Item>>
    where
        E: ListExtractor,
        E::Item: AsRef<InfoItem>,
    {
        let page = extractor.initial_page().await?;
        self.engine.validate_page(extractor.service(), &page)?;
        info!(
            extractor = %extractor.id(),
            item_count = page.len(),
            has_next = page.has_next_page(),
            "Initial page conforms"
        );
        Ok(page)
    }

    /// Fetches the next page and validates it. The extractor must report
    /// more items, and the page must not be empty unless the policy allows
    /// empty pages.
    pub async fn more_items<E>(&self, extractor: &mut E) -> Result<Page<E::Item>>
    where
        E: ListExtractor,
        E::Item: AsRef<InfoItem>,
    {
        if !extractor.has_next_page() {
            return Err(cursor_violation("Doesn't have more items").into());
        }
        let page = extractor.next_page().await?;
        if page.is_empty() && self.engine.config().require_items {
            return Err(ValidationError::new(ValidationErrorKind::EmptyList, "Next page is empty").into());
        }
        self.engine.validate_page(extractor.service(), &page)?;
        info!(
            extractor = %extractor.id(),
            item_count = page.len(),
            has_next = page.has_next_page(),
            "Next page conforms"
        );
        Ok(page)
    }

    /// Resumes on `fresh` from `extractor`'s current cursor and validates
    /// the page against `extractor`'s service.
    pub async fn page_in_new_extractor<E, F>(&self, extractor: &E, fresh: &mut F) -> Result<Page<F::Item>>
    where
        E: ListExtractor,
        F: ListExtractor,
        F::Item: AsRef<InfoItem>,
    {
        let cursor = extractor
            .next_cursor()
            .cloned()
            .ok_or_else(|| InvalidCursorError::absent(extractor.id()))?;
        let page = fresh.page(&cursor).await?;
        self.engine.validate_page(extractor.service(), &page)?;
        info!(
            extractor = %extractor.id(),
            item_count = page.len(),
            "Page fetched in new extractor conforms"
        );
        Ok(page)
    }
}

/// Fetches and validates the initial page with the default policy.
pub async fn default_test_related_items<E>(extractor: &mut E) -> Result<Page<E::Item>>
where
    E: ListExtractor,
    E::Item: AsRef<InfoItem>,
{
    ConformanceSuite::default().related_items(extractor).await
}

/// Fetches and validates the next page with the default policy.
pub async fn default_test_more_items<E>(extractor: &mut E) -> Result<Page<E::Item>>
where
    E: ListExtractor,
    E::Item: AsRef<InfoItem>,
{
    ConformanceSuite::default().more_items(extractor).await
}

/// Resumes on a fresh extractor and validates with the default policy.
pub async fn default_test_get_page_in_new_extractor<E, F>(
    extractor: &E,
    fresh: &mut F,
) -> Result<Page<F::Item>>
where
    E: ListExtractor,
    F: ListExtractor,
    F::Item: AsRef<InfoItem>,
{
    ConformanceSuite::default()
        .page_in_new_extractor(extractor, fresh)
        .await
}

/// Checks that an exhausted extractor reports no next page and holds no
/// usable cursor. Both are checked independently.
pub fn assert_no_more_items<E: ListExtractor>(extractor: &E) -> std::result::Result<(), ValidationError> {
    if extractor.has_next_page() {
        return Err(cursor_violation("More items available when it shouldn't"));
    }
    if is_usable(extractor.next_cursor()) {
        return Err(cursor_violation("Next page is not empty or null"));
    }
    Ok(())
}

/// Checks that `second` is not a positional repeat of `first`.
///
/// Only the overlapping prefix is compared. Pages with no overlap count as
/// equal.
pub fn assert_pages_differ<T: AsRef<InfoItem>>(
    first: &Page<T>,
    second: &Page<T>,
) -> std::result::Result<(), ValidationError> {
    let identical = first
        .items()
        .iter()
        .zip(second.items())
        .all(|(a, b)| a.as_ref().url == b.as_ref().url);
    if identical {
        return Err(cursor_violation("First and second page are equal"));
    }
    Ok(())
}

fn cursor_violation(message: &str) -> ValidationError {
    ValidationError::new(ValidationErrorKind::CursorInvariantViolation, message)
}

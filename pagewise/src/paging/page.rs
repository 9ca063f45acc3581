//! A single fetch's worth of items.

use serde::{Deserialize, Serialize};

use super::cursor::{is_usable, Cursor};
use crate::errors::ItemBuildError;
use crate::items::InfoItem;

/// Items from one fetch, the per-item errors hit while building them, and
/// the cursor for the next page.
///
/// Item order is extraction order and carries the backend's ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T = InfoItem> {
    items: Vec<T>,
    #[serde(default)]
    errors: Vec<ItemBuildError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    /// Creates a page.
    #[must_use]
    pub fn new(items: Vec<T>, errors: Vec<ItemBuildError>, next_cursor: Option<Cursor>) -> Self {
        Self {
            items,
            errors,
            next_cursor,
        }
    }

    /// Creates a page with no item errors.
    #[must_use]
    pub fn from_items(items: Vec<T>, next_cursor: Option<Cursor>) -> Self {
        Self::new(items, Vec::new(), next_cursor)
    }

    /// Items in extraction order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Per-item failures.
    #[must_use]
    pub fn errors(&self) -> &[ItemBuildError] {
        &self.errors
    }

    /// Cursor for the next page, as the backend returned it.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.next_cursor.as_ref()
    }

    /// Returns true if the cursor is present and non-empty.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        is_usable(self.next_cursor.as_ref())
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Splits the page into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Vec<ItemBuildError>, Option<Cursor>) {
        (self.items, self.errors, self.next_cursor)
    }
}

impl<T: AsRef<InfoItem>> Page<T> {
    /// Item URLs in order.
    #[must_use]
    pub fn urls(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.as_ref().url.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ChannelDetails;

    #[test]
    fn test_has_next_page_requires_non_empty_cursor() {
        let none: Page<u8> = Page::from_items(vec![1], None);
        let empty: Page<u8> = Page::from_items(vec![1], Some(Cursor::new("")));
        let some: Page<u8> = Page::from_items(vec![1], Some(Cursor::new("c1")));

        assert!(!none.has_next_page());
        assert!(!empty.has_next_page());
        assert!(empty.next_cursor().is_some());
        assert!(some.has_next_page());
    }

    #[test]
    fn test_urls_keep_order() {
        let page = Page::from_items(
            vec![
                InfoItem::channel(0, "https://a/1", "one", ChannelDetails::default()),
                InfoItem::channel(0, "https://a/2", "two", ChannelDetails::default()),
            ],
            None,
        );
        assert_eq!(page.urls(), vec!["https://a/1", "https://a/2"]);
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn test_into_parts() {
        let page: Page<u8> = Page::new(vec![1, 2], vec![ItemBuildError::new("x")], None);
        let (items, errors, cursor) = page.into_parts();
        assert_eq!(items, vec![1, 2]);
        assert_eq!(errors.len(), 1);
        assert!(cursor.is_none());
    }
}

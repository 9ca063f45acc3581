//! Cursor-based pagination.
//!
//! A backend implements [`PageSource`]; [`Paginated`] wraps it into the
//! stateful [`ListExtractor`] that drivers and conformance checks use.

mod cursor;
mod page;
mod paginated;
mod protocol;

pub use cursor::{is_usable, Cursor};
pub use page::Page;
pub use paginated::{Paginated, PaginationState};
pub use protocol::{ListExtractor, PageSource};

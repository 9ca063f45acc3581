//! Page validation.
//!
//! [`ValidationEngine`] runs an ordered chain of rules over a page's items
//! and collected errors and reports the first violation. The URL helpers are
//! public so backend tests can check request URLs and cursors too.

mod config;
mod engine;
mod urls;

pub use config::ValidationConfig;
pub use engine::{ValidationEngine, ValidationResult};
pub use urls::{is_secure_url, query_param};

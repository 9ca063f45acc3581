//! Link classification and service identity.
//!
//! Each backend owns a [`LinkClassifier`] scoped to its URL grammar. The
//! classifier is what lets validation cross-check items, e.g. a stream's
//! uploader URL must classify as a channel even though it is never fetched.

mod classifier;
mod service;

pub use classifier::{FnClassifier, LinkClassifier, LinkType, PatternClassifier};
pub use service::{ServiceDescriptor, ServiceRegistry};

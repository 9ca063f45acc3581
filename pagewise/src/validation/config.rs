//! Configuration for the validation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collector::ErrorTolerance;

/// Policy knobs for [`ValidationEngine`](super::ValidationEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// How many item errors a page may carry.
    #[serde(default)]
    pub error_tolerance: ErrorTolerance,
    /// Whether an empty item list is a violation.
    #[serde(default = "default_require_items")]
    pub require_items: bool,
    /// Fixed "now" for upload date checks. Uses the wall clock when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_time: Option<DateTime<Utc>>,
}

fn default_require_items() -> bool {
    true
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            error_tolerance: ErrorTolerance::default(),
            require_items: default_require_items(),
            reference_time: None,
        }
    }
}

impl ValidationConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error tolerance.
    #[must_use]
    pub fn with_error_tolerance(mut self, tolerance: ErrorTolerance) -> Self {
        self.error_tolerance = tolerance;
        self
    }

    /// Sets whether empty pages are rejected.
    #[must_use]
    pub fn with_require_items(mut self, require: bool) -> Self {
        self.require_items = require;
        self
    }

    /// Pins the reference time used for upload date checks.
    #[must_use]
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    /// The time upload dates are compared against.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults_from_empty_document() {
        let config: ValidationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ValidationConfig::default());
        assert!(config.require_items);
        assert_eq!(config.error_tolerance, ErrorTolerance::None);
    }

    #[test]
    fn test_reference_time_is_used() {
        let pinned = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let config = ValidationConfig::new().with_reference_time(pinned);
        assert_eq!(config.now(), pinned);
    }
}

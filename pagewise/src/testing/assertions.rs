//! Panicking assertions for backend test suites.

use crate::errors::{PagewiseError, ValidationErrorKind};
use crate::items::InfoItem;
use crate::linking::ServiceDescriptor;
use crate::paging::Page;
use crate::validation::{ValidationEngine, ValidationResult};

/// Asserts a page passes validation with the default policy.
///
/// # Panics
///
/// Panics with the violation's code and message.
pub fn assert_valid_page<T: AsRef<InfoItem>>(service: &ServiceDescriptor, page: &Page<T>) {
    if let Err(err) = ValidationEngine::default().validate_page(service, page) {
        panic!("page failed validation [{}]: {err}", err.code());
    }
}

/// Asserts a validation run failed with the given kind.
///
/// # Panics
///
/// Panics if the run passed or failed with another kind.
pub fn assert_violation(result: &ValidationResult, expected: ValidationErrorKind) {
    match result {
        Ok(()) => panic!("expected {expected} violation, validation passed"),
        Err(err) => assert_eq!(
            err.kind, expected,
            "expected {expected} violation, got {}: {err}",
            err.kind
        ),
    }
}

/// Asserts a crate-level result failed validation with the given kind.
///
/// # Panics
///
/// Panics if the result is `Ok` or not a validation failure of that kind.
pub fn assert_failed_with<T: std::fmt::Debug>(
    result: &Result<T, PagewiseError>,
    expected: ValidationErrorKind,
) {
    match result {
        Ok(value) => panic!("expected {expected} violation, got Ok({value:?})"),
        Err(err) => match err.as_validation() {
            Some(validation) => assert_eq!(
                validation.kind, expected,
                "expected {expected} violation, got {}: {validation}",
                validation.kind
            ),
            None => panic!("expected {expected} violation, got {err}"),
        },
    }
}

//! The ordered rule chain every backend page must pass.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::config::ValidationConfig;
use super::urls::is_secure_url;
use crate::errors::{ItemBuildError, ValidationError, ValidationErrorKind};
use crate::items::{InfoItem, ItemKind, StreamDetails};
use crate::linking::{LinkType, ServiceDescriptor};
use crate::paging::Page;

/// Outcome of a validation run.
pub type ValidationResult = Result<(), ValidationError>;

/// What a per-item rule sees besides the item.
#[derive(Debug, Clone, Copy)]
struct RuleContext<'a> {
    service: &'a ServiceDescriptor,
    now: DateTime<Utc>,
}

type ItemRule = fn(&RuleContext<'_>, &InfoItem) -> ValidationResult;

/// Per-item rules, applied in order.
const ITEM_RULES: &[ItemRule] = &[
    check_url,
    check_thumbnail,
    check_info_type,
    check_name,
    check_service_id,
    check_variant,
];

/// Checks pages against the item, link and error contracts.
///
/// Validation is pure: the engine holds only configuration and can be
/// shared between tasks.
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates a sequence of item slots and the errors collected with them.
    ///
    /// Slots are optional so that null entries from loosely typed sources
    /// can be reported instead of silently skipped. Returns the first
    /// violation found.
    pub fn validate<'a, I>(
        &self,
        service: &ServiceDescriptor,
        items: I,
        errors: &[ItemBuildError],
    ) -> ValidationResult
    where
        I: IntoIterator<Item = Option<&'a InfoItem>>,
    {
        let slots: Vec<Option<&InfoItem>> = items.into_iter().collect();
        let result = self.run(service, &slots, errors);
        match &result {
            Ok(()) => debug!(
                service_id = service.id(),
                item_count = slots.len(),
                error_count = errors.len(),
                "Page passed validation"
            ),
            Err(err) => debug!(
                service_id = service.id(),
                code = err.code(),
                error = %err,
                "Page failed validation"
            ),
        }
        result
    }

    /// Validates a typed page.
    pub fn validate_page<T: AsRef<InfoItem>>(
        &self,
        service: &ServiceDescriptor,
        page: &Page<T>,
    ) -> ValidationResult {
        self.validate(
            service,
            page.items().iter().map(|item| Some(item.as_ref())),
            page.errors(),
        )
    }

    fn run(
        &self,
        service: &ServiceDescriptor,
        slots: &[Option<&InfoItem>],
        errors: &[ItemBuildError],
    ) -> ValidationResult {
        if !self.config.error_tolerance.permits(errors.len()) {
            let first = errors.first().map(ToString::to_string).unwrap_or_default();
            return Err(ValidationError::new(
                ValidationErrorKind::UnexpectedErrors,
                format!(
                    "Errors during extraction: {} item error(s) not permitted by {:?} tolerance; first: {first}",
                    errors.len(),
                    self.config.error_tolerance
                ),
            ));
        }

        if slots.is_empty() && self.config.require_items {
            return Err(ValidationError::new(
                ValidationErrorKind::EmptyList,
                "List of items is empty",
            ));
        }

        if let Some(index) = slots.iter().position(Option::is_none) {
            return Err(ValidationError::new(
                ValidationErrorKind::NullItem,
                "List of items contains a null element",
            )
            .at(index));
        }

        let ctx = RuleContext {
            service,
            now: self.config.now(),
        };
        for (index, item) in slots.iter().copied().flatten().enumerate() {
            for rule in ITEM_RULES {
                rule(&ctx, item).map_err(|err| err.for_item(index, &item.name, &item.url))?;
            }
        }
        Ok(())
    }
}

fn check_url(_: &RuleContext<'_>, item: &InfoItem) -> ValidationResult {
    require_secure("Item url", &item.url)
}

fn check_thumbnail(_: &RuleContext<'_>, item: &InfoItem) -> ValidationResult {
    match item.thumbnail_url.as_deref() {
        Some(thumbnail) if !thumbnail.is_empty() && !is_secure_url(thumbnail) => Err(
            ValidationError::new(
                ValidationErrorKind::InsecureUrl,
                format!("Thumbnail url is not secure: \"{thumbnail}\""),
            ),
        ),
        _ => Ok(()),
    }
}

fn check_info_type(_: &RuleContext<'_>, item: &InfoItem) -> ValidationResult {
    if item.info_type().is_none() {
        return Err(ValidationError::new(
            ValidationErrorKind::MissingField,
            "InfoItem type not set",
        ));
    }
    Ok(())
}

fn check_name(_: &RuleContext<'_>, item: &InfoItem) -> ValidationResult {
    require_non_empty("Item name", &item.name)
}

fn check_service_id(ctx: &RuleContext<'_>, item: &InfoItem) -> ValidationResult {
    if item.service_id != ctx.service.id() {
        return Err(ValidationError::new(
            ValidationErrorKind::ServiceIdMismatch,
            format!(
                "Unexpected item service id: expected {}, got {}",
                ctx.service.id(),
                item.service_id
            ),
        ));
    }
    Ok(())
}

fn check_variant(ctx: &RuleContext<'_>, item: &InfoItem) -> ValidationResult {
    match &item.kind {
        ItemKind::Stream(details) => check_stream(ctx, &item.url, details),
        ItemKind::Channel(_) => expect_link_type(ctx.service, &item.url, LinkType::Channel),
        ItemKind::Playlist(_) => expect_link_type(ctx.service, &item.url, LinkType::Playlist),
        ItemKind::Unknown => Ok(()),
    }
}

fn check_stream(ctx: &RuleContext<'_>, url: &str, details: &StreamDetails) -> ValidationResult {
    require_non_empty("Uploader name", &details.uploader_name)?;
    require_secure("Uploader url", &details.uploader_url)?;

    expect_link_type(ctx.service, url, LinkType::Stream)?;
    expect_link_type(ctx.service, &details.uploader_url, LinkType::Channel)?;

    if details
        .textual_upload_date
        .as_deref()
        .is_some_and(|text| !text.is_empty())
    {
        let Some(upload_date) = &details.upload_date else {
            return Err(ValidationError::new(
                ValidationErrorKind::MissingField,
                "No parsed upload date",
            ));
        };
        if !upload_date.is_before(ctx.now) {
            return Err(ValidationError::new(
                ValidationErrorKind::FutureUploadDate,
                format!("Upload date not in the past: {}", upload_date.date),
            ));
        }
    }
    Ok(())
}

fn require_non_empty(what: &str, value: &str) -> ValidationResult {
    if value.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::MissingField,
            format!("{what} not set"),
        ));
    }
    Ok(())
}

fn require_secure(what: &str, value: &str) -> ValidationResult {
    require_non_empty(what, value)?;
    if !is_secure_url(value) {
        return Err(ValidationError::new(
            ValidationErrorKind::InsecureUrl,
            format!("{what} is not secure: \"{value}\""),
        ));
    }
    Ok(())
}

fn expect_link_type(service: &ServiceDescriptor, url: &str, expected: LinkType) -> ValidationResult {
    let actual = service.link_type(url).map_err(|err| {
        ValidationError::new(
            ValidationErrorKind::WrongLinkType,
            format!("Could not classify \"{url}\": {err}"),
        )
    })?;
    if actual == LinkType::None {
        return Err(ValidationError::new(
            ValidationErrorKind::WrongLinkType,
            format!("Url is not recognized by its own service: \"{url}\""),
        ));
    }
    if actual != expected {
        return Err(ValidationError::new(
            ValidationErrorKind::WrongLinkType,
            format!("Service returned wrong link type for: \"{url}\" (expected {expected}, got {actual})"),
        ));
    }
    Ok(())
}

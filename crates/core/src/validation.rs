//! Request input validation
//!
//! Provides validation for:
//! - Category and announcement request bodies
//! - Path identifiers
//! - Publication dates, both API timestamps and the admin form format
//!
//! # Example
//!
//! ```rust
//! use bulletin_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("name", "  ")
//!     .positive_id("id", Some(0))
//!     .validate();
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.errors().len(), 2);
//! ```

use crate::error::{Error, ErrorCode, Result};
use crate::model::{AnnouncementInput, CategoryInput};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shape of the admin form's publication date, checked before calendar validity
static PUBLICATION_INPUT_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2})/(\d{2})/(\d{4})\s(\d{2}):(\d{2})$").expect("publication input pattern")
});

/// Message for input that does not look like `MM/DD/YYYY HH:mm`
pub const PUBLICATION_FORMAT_MESSAGE: &str = "Use format MM/DD/YYYY HH:mm";

/// Message for well-shaped input that names no real instant
pub const PUBLICATION_CALENDAR_MESSAGE: &str = "Enter a valid calendar date and time";

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Actual value (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>, code: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            code: code.to_string(),
            expected: None,
            actual: None,
        }
    }

    fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Convert to Result type
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            Err(Error::new(
                ErrorCode::ValidationError,
                format!("Validation failed: {}", messages.join("; ")),
            ))
        }
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate that a field is not blank
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(
                ValidationError::new(field, "Field is required", "REQUIRED")
                    .with_expected("non-empty value")
                    .with_actual("empty"),
            );
        }
        self
    }

    /// Validate that an identifier is present and at least 1
    pub fn positive_id(mut self, field: &str, value: Option<i64>) -> Self {
        match value {
            None => self.result.add_error(
                ValidationError::new(field, "Field is required", "REQUIRED")
                    .with_expected("integer >= 1"),
            ),
            Some(id) if id < 1 => self.result.add_error(
                ValidationError::new(field, "Must be a positive integer", "POSITIVE_ID")
                    .with_expected("integer >= 1")
                    .with_actual(id.to_string()),
            ),
            Some(_) => {}
        }
        self
    }

    /// Validate that a list has at least one element
    pub fn non_empty_list<T>(mut self, field: &str, values: &[T]) -> Self {
        if values.is_empty() {
            self.result.add_error(
                ValidationError::new(field, "At least one value is required", "NON_EMPTY")
                    .with_expected("one or more values"),
            );
        }
        self
    }

    /// Validate that every identifier in a list is at least 1
    pub fn each_positive(mut self, field: &str, values: &[i64]) -> Self {
        for (index, id) in values.iter().enumerate() {
            if *id < 1 {
                self.result.add_error(
                    ValidationError::new(
                        &format!("{}[{}]", field, index),
                        "Must be a positive integer",
                        "POSITIVE_ID",
                    )
                    .with_expected("integer >= 1")
                    .with_actual(id.to_string()),
                );
            }
        }
        self
    }

    /// Validate that a value parses as a timestamp
    pub fn rfc3339_date(mut self, field: &str, value: &str) -> Self {
        if parse_timestamp(value).is_none() {
            self.result.add_error(
                ValidationError::new(field, "Must be a valid date", "INVALID_DATE")
                    .with_expected("RFC 3339 timestamp")
                    .with_actual(value.to_string()),
            );
        }
        self
    }

    /// Get the validation result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

/// Whether an input is creating a record or replacing an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// The body must carry its own id
    Create,
    /// The id comes from the path; any body id is ignored
    Update,
}

/// Validate a category request body
pub fn validate_category_input(input: &CategoryInput, mode: InputMode) -> ValidationResult {
    let mut validator = Validator::new();
    if mode == InputMode::Create {
        validator = validator.positive_id("id", input.id);
    }
    validator.required("name", &input.name).validate()
}

/// Validate an announcement request body
pub fn validate_announcement_input(input: &AnnouncementInput, mode: InputMode) -> ValidationResult {
    let mut validator = Validator::new();
    if mode == InputMode::Create {
        validator = validator.positive_id("id", input.id);
    }

    let category_ids = input.category_ids();
    validator
        .required("title", &input.title)
        .required("description", &input.description)
        .non_empty_list("categoryIds", &category_ids)
        .each_positive("categoryIds", &category_ids)
        .rfc3339_date("publicationDate", &input.publication_date)
        .validate()
}

/// Validate an identifier taken from a request path
pub fn parse_path_id(field: &str, raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(Error::new(
            ErrorCode::ValidationError,
            format!("Validation failed: {}: Must be a positive integer", field),
        )),
    }
}

/// Parse an API timestamp
///
/// Accepts RFC 3339, a zone-less `YYYY-MM-DDTHH:MM[:SS]` read as UTC, or a
/// bare `YYYY-MM-DD` meaning midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// Parse the admin form's `MM/DD/YYYY HH:mm` publication date (UTC)
///
/// A malformed string fails with [`PUBLICATION_FORMAT_MESSAGE`]; a
/// well-formed one naming an impossible date or time fails with
/// [`PUBLICATION_CALENDAR_MESSAGE`].
pub fn parse_publication_input(value: &str) -> Result<DateTime<Utc>> {
    let invalid_format = || {
        Error::new(ErrorCode::InvalidFormat, PUBLICATION_FORMAT_MESSAGE)
            .with_context(format!("Received: {:?}", value))
    };

    let captures = PUBLICATION_INPUT_SHAPE
        .captures(value)
        .ok_or_else(invalid_format)?;

    let number = |index: usize| -> Option<u32> { captures.get(index)?.as_str().parse().ok() };
    let (Some(month), Some(day), Some(year), Some(hours), Some(minutes)) =
        (number(1), number(2), number(3), number(4), number(5))
    else {
        return Err(invalid_format());
    };

    let year = i32::try_from(year).map_err(|_| invalid_format())?;
    NaiveDate::from_ymd_opt(year, month, day)
        .zip(NaiveTime::from_hms_opt(hours, minutes, 0))
        .map(|(date, time)| Utc.from_utc_datetime(&date.and_time(time)))
        .ok_or_else(|| {
            Error::new(ErrorCode::InvalidInput, PUBLICATION_CALENDAR_MESSAGE)
                .with_context(format!("Received: {:?}", value))
        })
}

/// Format a timestamp as the admin form's `MM/DD/YYYY HH:mm`
pub fn format_publication_input(value: &DateTime<Utc>) -> String {
    value.format("%m/%d/%Y %H:%M").to_string()
}

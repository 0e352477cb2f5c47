//! Input validation for invoice requests.
//!
//! Every problem in a request is collected so the server log shows the whole
//! picture at once. Clients only ever see the generic failure response.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use super::common::DATE_INPUT_FORMAT;
use super::models::AmountField;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex");
}

/// Validation error with a field name and a readable message.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The JSON field that failed validation
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create error for empty required field
    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} must not be empty", label))
    }

    pub fn invalid_email(field: &str) -> Self {
        Self::new(field, "Email address is not valid").with_suggestion("Use a format like jane@example.com")
    }

    pub fn invalid_phone(field: &str) -> Self {
        Self::new(field, "Phone number is not valid")
            .with_suggestion("Use 7 to 15 digits, separators like spaces or dashes are allowed")
    }

    pub fn invalid_amount(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} is not a number", label)).with_suggestion("Use a value like 49.99")
    }

    pub fn negative_amount(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} must not be negative", label))
    }

    pub fn invalid_date(field: &str, value: &str) -> Self {
        Self::new(field, format!("Date '{}' is not valid", value)).with_suggestion("Use the format YYYY-MM-DD")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors.
#[derive(Debug, Default, Clone)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Ok if no errors were collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self { errors: vec![error] }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} problem(s) found", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "; {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Validation functions
// ============================================================================

/// Trimmed value, or `None` when missing or blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

pub fn validate_email(value: &str, field: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::empty_field(field, "Member email"));
        return;
    }

    if !EMAIL_RE.is_match(trimmed) {
        errors.add(ValidationError::invalid_email(field));
    }
}

/// Validate phone number format - optional, only validated if provided
pub fn validate_phone_optional(value: Option<&str>, field: &str, errors: &mut ValidationErrors) {
    let Some(trimmed) = non_blank(value) else {
        return;
    };

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '.' | '+');
    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();

    if !trimmed.chars().all(allowed) || !(7..=15).contains(&digits) {
        errors.add(ValidationError::invalid_phone(field));
    }
}

/// Parse a required, non-negative amount.
pub fn parse_amount_required(
    value: Option<&AmountField>,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    match value {
        Some(amount) if !amount.is_blank() => check_amount(amount, field, label, errors),
        _ => {
            errors.add(ValidationError::empty_field(field, label));
            None
        }
    }
}

/// Parse an optional, non-negative amount. Missing or blank values yield `None`.
pub fn parse_amount_optional(
    value: Option<&AmountField>,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    match value {
        Some(amount) if !amount.is_blank() => check_amount(amount, field, label, errors),
        _ => None,
    }
}

fn check_amount(
    amount: &AmountField,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    match amount.to_f64() {
        Some(value) if value < 0.0 => {
            errors.add(ValidationError::negative_amount(field, label));
            None
        }
        Some(value) => Some(value),
        None => {
            errors.add(ValidationError::invalid_amount(field, label));
            None
        }
    }
}

/// Parse a required `YYYY-MM-DD` date.
pub fn parse_date_required(
    value: &str,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    match non_blank(Some(value)) {
        Some(trimmed) => parse_date(trimmed, field, errors),
        None => {
            errors.add(ValidationError::empty_field(field, label));
            None
        }
    }
}

pub fn parse_date(value: &str, field: &str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value.trim(), DATE_INPUT_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(ValidationError::invalid_date(field, value));
            None
        }
    }
}

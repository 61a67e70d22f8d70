//! Generic validation results.
//!
//! Used by checks that report several problems at once and distinguish hard
//! errors from warnings (for example the pre-compile input checks in
//! `deepnote-blocks`). Messages are stable for identical inputs.

use std::fmt::Display;

use serde::Serialize;

/// Outcome of a validation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult<T = ()> {
    pub success: bool,
    /// The validated value; present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl<T> ValidationResult<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_warnings(data, Vec::new())
    }

    pub fn success_with_warnings(data: T, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            errors: Vec::new(),
            warnings,
        }
    }

    pub fn failure(errors: Vec<String>) -> Self {
        Self::failure_with_warnings(errors, Vec::new())
    }

    pub fn failure_with_warnings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            errors,
            warnings,
        }
    }

    /// Drop the data, keeping messages.
    pub fn discard(self) -> ValidationResult {
        ValidationResult {
            success: self.success,
            data: self.success.then_some(()),
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    /// Errors joined with `; `, or a generic message.
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            "Validation failed".to_string()
        } else {
            self.errors.join("; ")
        }
    }
}

impl ValidationResult {
    /// A successful result with no messages.
    pub fn ok() -> Self {
        Self::success(())
    }

    /// Merge results. Fails if any input failed.
    pub fn combine<I>(results: I) -> Self
    where
        I: IntoIterator<Item = ValidationResult>,
    {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        for r in results {
            errors.extend(r.errors);
            warnings.extend(r.warnings);
        }
        if errors.is_empty() {
            Self::success_with_warnings((), warnings)
        } else {
            Self::failure_with_warnings(errors, warnings)
        }
    }
}

pub fn validate_defined<T>(value: Option<T>, field: &str) -> ValidationResult<T> {
    match value {
        Some(v) => ValidationResult::success(v),
        None => ValidationResult::failure(vec![format!("{field} is required")]),
    }
}

/// Accepts a string with non-whitespace content; the data is the trimmed value.
pub fn validate_non_empty_string(value: Option<&str>, field: &str) -> ValidationResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => ValidationResult::success(v.to_string()),
        _ => ValidationResult::failure(vec![format!("{field} must be a non-empty string")]),
    }
}

pub fn validate_number_in_range<N>(value: N, min: N, max: N, field: &str) -> ValidationResult<N>
where
    N: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        return ValidationResult::failure(vec![format!(
            "{field} must be between {min} and {max}, got {value}"
        )]);
    }
    ValidationResult::success(value)
}

pub fn validate_one_of<'a>(value: &str, options: &[&'a str], field: &str) -> ValidationResult<&'a str> {
    match options.iter().find(|o| **o == value) {
        Some(o) => ValidationResult::success(*o),
        None => ValidationResult::failure(vec![format!(
            "{field} must be one of: {}. Got: {value}",
            options.join(", ")
        )]),
    }
}

pub fn validate_non_empty_array<T>(value: Option<Vec<T>>, field: &str) -> ValidationResult<Vec<T>> {
    match value {
        Some(v) if !v.is_empty() => ValidationResult::success(v),
        _ => ValidationResult::failure(vec![format!("{field} must have at least one element")]),
    }
}

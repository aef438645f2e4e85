//! Argument guards run before a request is built.
//!
//! Messages follow `Error from <source>: Missing or invalid <field> parameter`,
//! where `<source>` is the API method name the caller used.

use crate::error::{Result, SideshiftError};

pub fn error_message(field: &str, source: &str) -> String {
    format!("Error from {source}: Missing or invalid {field} parameter")
}

fn invalid(field: &str, source: &str) -> SideshiftError {
    SideshiftError::Validation(error_message(field, source))
}

/// Non-blank string; returns the trimmed value.
pub fn validate_string(value: &str, field: &str, source: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(field, source));
    }
    Ok(trimmed.to_string())
}

/// Optional string: blank counts as absent.
pub fn optional_string(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Finite, non-negative number.
pub fn validate_number(value: f64, field: &str, source: &str) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, source));
    }
    Ok(value)
}

/// Non-empty list of non-blank strings; returns the trimmed elements.
pub fn validate_array<S: AsRef<str>>(values: &[S], field: &str, source: &str) -> Result<Vec<String>> {
    if values.is_empty() {
        return Err(SideshiftError::Validation(format!(
            "{} - must be a non-empty array",
            error_message(field, source)
        )));
    }

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let trimmed = value.as_ref().trim();
            if trimmed.is_empty() {
                Err(SideshiftError::Validation(format!(
                    "{} - each element must be a non-empty string",
                    error_message(&format!("{field}[{i}]"), source)
                )))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

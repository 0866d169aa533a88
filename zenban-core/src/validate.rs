//! Field-level validation shared by column and task input.

use serde::Deserialize;

use crate::error::ValidationError;

/// Checks a title and returns it trimmed.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyTitle`] for a blank title, or
/// [`ValidationError::TitleTooLong`] if it exceeds `max` characters.
pub fn validate_title(raw: &str, max: usize) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.chars().count() > max {
        return Err(ValidationError::TitleTooLong { max });
    }
    Ok(title.to_string())
}

/// Normalizes a comma-separated assignee list.
///
/// Names are trimmed and empty entries dropped; the result is re-joined
/// with `", "`. Returns `None` when no names remain.
#[must_use]
pub fn normalize_assignees(raw: &str) -> Option<String> {
    let names: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

/// A boolean flag that older clients send as a 0/1 integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    /// A JSON boolean.
    Bool(bool),
    /// A JSON integer, only 0 and 1 are accepted.
    Int(i64),
}

impl Flag {
    /// Converts the flag into a boolean.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFlag`] for integers other than 0 or 1.
    pub const fn into_bool(self, field: &'static str) -> Result<bool, ValidationError> {
        match self {
            Self::Bool(value) => Ok(value),
            Self::Int(0) => Ok(false),
            Self::Int(1) => Ok(true),
            Self::Int(value) => Err(ValidationError::InvalidFlag { field, value }),
        }
    }
}

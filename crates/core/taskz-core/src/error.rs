//! Error types for parsing and form handling.

use thiserror::Error;

/// Failure to parse one of the closed vocabularies (priority, status, filter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown priority '{0}' (expected low, medium or high)")]
    Priority(String),

    #[error("Unknown status '{0}' (expected pending, in_progress or completed)")]
    Status(String),

    #[error("Unknown status filter '{0}' (expected all, pending, in_progress or completed)")]
    StatusFilter(String),
}

/// Errors raised while turning task form fields into a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid date for {field}: '{value}' (expected YYYY-MM-DDTHH:mm)")]
    InvalidDate { field: &'static str, value: String },

    #[error("Local time {value} for {field} does not exist in this time zone")]
    NonexistentLocalTime { field: &'static str, value: String },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
}

impl FormError {
    pub fn invalid_date<S: Into<String>>(field: &'static str, value: S) -> Self {
        Self::InvalidDate {
            field,
            value: value.into(),
        }
    }
}

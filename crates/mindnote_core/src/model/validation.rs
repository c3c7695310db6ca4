//! Field-level validation errors for caller input.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// A required field is missing/blank or carries an unusable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Offending input field, named as the caller sent it.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.field, self.message)
    }
}

impl Error for ValidationError {}

/// Rejects empty and whitespace-only values for a required string field.
pub fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::require_non_blank;

    #[test]
    fn blank_values_are_rejected_with_field_name() {
        let err = require_non_blank("title", " \t ").unwrap_err();
        assert_eq!(err.field, "title");
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn surrounding_whitespace_is_accepted() {
        assert!(require_non_blank("title", "  Ship  ").is_ok());
    }
}

use serde::Serialize;
use thiserror::Error;

use crate::validator::SchemaViolation;

pub type FormResult<T> = Result<T, FormError>;

/// Message shown when the config buffer is not parseable JSON at all.
pub const INVALID_JSON_MESSAGE: &str = "Config is not a valid JSON";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Config is not a valid JSON")]
    InvalidJson,

    #[error("{0}")]
    SchemaViolation(SchemaViolation),

    #[error("Invalid field key '{key}': expected 'form-field-<index>'")]
    InvalidFieldKey { key: String },

    #[error("Field key '{key}' points at index {index}, but the form only has {field_count} fields")]
    StaleFieldKey {
        key: String,
        index: usize,
        field_count: usize,
    },

    #[error("No button at index {index}: the form has {button_count} buttons")]
    UnknownButton { index: usize, button_count: usize },

    #[error("Invalid date value '{value}': expected YYYY-MM-DD, an RFC 3339 timestamp or DD/MM/YYYY")]
    InvalidDate { value: String },

    #[error("Invalid choice '{value}' for field '{field}'")]
    InvalidChoice { field: String, value: String },

    #[error("Config has errors and cannot be reformatted")]
    PrettifyDisabled,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl FormError {
    /// True for the two errors a user can fix by editing the config text.
    pub fn is_config_error(&self) -> bool {
        matches!(self, FormError::InvalidJson | FormError::SchemaViolation(_))
    }

    /// The `{ "message": ... }` shape exposed next to the editor.
    pub fn to_display(&self) -> ErrorDisplay {
        ErrorDisplay {
            message: self.to_string(),
        }
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for FormError {
    fn from(err: std::io::Error) -> Self {
        FormError::Io(err.to_string())
    }
}

impl From<SchemaViolation> for FormError {
    fn from(violation: SchemaViolation) -> Self {
        FormError::SchemaViolation(violation)
    }
}

/// Serializable error object: just the human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDisplay {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_message_is_fixed() {
        assert_eq!(FormError::InvalidJson.to_string(), INVALID_JSON_MESSAGE);
        assert!(FormError::InvalidJson.is_config_error());
    }

    #[test]
    fn test_stale_key_is_not_a_config_error() {
        let err = FormError::StaleFieldKey {
            key: "form-field-3".to_string(),
            index: 3,
            field_count: 1,
        };
        assert!(!err.is_config_error());
        assert_eq!(
            err.to_display().message,
            "Field key 'form-field-3' points at index 3, but the form only has 1 fields"
        );
    }
}

//! # formspec
//!
//! Validation and submission mapping engine for forms described in JSON.
//!
//! ## Features
//! - Closed, declarative config schema with conditional keys, uniqueness rules and limits
//! - Path-qualified error messages (`child "fields" fails because [...]`)
//! - Typed config model with one variant per field type
//! - OpenAPI-style schema document generated from the same schema definition
//! - Mapping of `form-field-<index>` submissions back to ordered `{label, value}` records
//!
//! ## Example
//! ```ignore
//! use formspec::{validate_config, FormSession};
//! use serde_json::json;
//!
//! let config = validate_config(r#"{
//!   "fields": [{ "type": "text", "label": "Name" }],
//!   "buttons": [{ "type": "submit", "label": "Send" }]
//! }"#).expect("valid config");
//!
//! let mut session = FormSession::new(&config);
//! session.set_value(0, json!("Ada"))?;
//! let records = session.submit()?;
//! ```

pub mod config;
pub mod date;
pub mod editor;
pub mod error;
pub mod introspect;
pub mod schema;
pub mod session;
pub mod submission;
pub mod validator;

// --- Core types ---
pub use config::{
    ButtonDescriptor, ButtonType, Choice, FieldCommon, FieldDescriptor, FieldType, FormConfig,
    Intent, RadioField,
};
pub use error::{ErrorDisplay, FormError, FormResult, INVALID_JSON_MESSAGE};
pub use validator::{
    FieldPath, SchemaViolation, ValidationOptions, ValidationOutcome, ViolationDetail,
    ViolationKind,
};

// --- Form interpretation ---
pub use date::{format_date, parse_date, parse_date_input, DATE_FORMAT};
pub use editor::{ConfigEditor, DEFAULT_CONFIG};
pub use introspect::{schema_document, schema_document_json, SchemaDocument};
pub use session::{ButtonAction, FormSession};
pub use submission::{
    format_json, index_to_key, key_to_index, map_submit_data, print_json, SubmissionRecord,
    SubmittedValues, FIELD_KEY_PREFIX,
};

/// Parse and validate a config, reporting the first violation
pub fn validate_config(text: &str) -> FormResult<FormConfig> {
    validator::validate_config(text)
}

/// Parse and validate a config with explicit options (e.g. collect every violation)
pub fn validate_config_with(text: &str, options: ValidationOptions) -> FormResult<FormConfig> {
    validator::validate_config_with(text, options)
}

/// Validate an already-parsed JSON value
pub fn validate_value(value: &serde_json::Value) -> FormResult<FormConfig> {
    validator::validate_value(value, ValidationOptions::default())
}

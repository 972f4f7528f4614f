use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::{trace, warn};

use crate::config::FieldDescriptor;
use crate::error::{FormError, FormResult};

/// Prefix of every synthetic field identifier
pub const FIELD_KEY_PREFIX: &str = "form-field-";

/// Submitted values keyed by synthetic identifier; absent keys mean "no value"
pub type SubmittedValues = Map<String, Value>;

/// One `{label, value}` entry of a submission result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub value: Value,
}

/// Synthetic identifier for the field at `index`
pub fn index_to_key(index: usize) -> String {
    format!("{}{}", FIELD_KEY_PREFIX, index)
}

/// Invert [`index_to_key`]. Only keys it could have produced are accepted, so
/// `form-field-01` or `form-field-+1` never alias `form-field-1`.
pub fn key_to_index(key: &str) -> FormResult<usize> {
    static FIELD_KEY_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = FIELD_KEY_REGEX
        .get_or_init(|| Regex::new(r"^form-field-(0|[1-9][0-9]*)$").unwrap());

    re.captures(key)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .ok_or_else(|| FormError::InvalidFieldKey {
            key: key.to_string(),
        })
}

/// Rebuild the ordered `{label, value}` list from an unordered submission.
///
/// Output follows field declaration order, not submission order. A key whose
/// index has no field means the submission and field list are out of sync and
/// is reported as [`FormError::StaleFieldKey`] rather than dropped.
pub fn map_submit_data(
    fields: &[FieldDescriptor],
    values: &SubmittedValues,
) -> FormResult<Vec<SubmissionRecord>> {
    let mut indexed = values
        .iter()
        .map(|(key, value)| {
            let index = key_to_index(key)?;
            if index >= fields.len() {
                warn!(key = %key, index, field_count = fields.len(), "submission references a missing field");
                return Err(FormError::StaleFieldKey {
                    key: key.clone(),
                    index,
                    field_count: fields.len(),
                });
            }
            Ok((index, value))
        })
        .collect::<FormResult<Vec<_>>>()?;

    indexed.sort_by_key(|(index, _)| *index);

    let records: Vec<SubmissionRecord> = indexed
        .into_iter()
        .map(|(index, value)| SubmissionRecord {
            label: fields[index].label().map(str::to_string),
            value: value.clone(),
        })
        .collect();

    trace!(records = records.len(), "submission mapped");
    Ok(records)
}

/// Pretty-print with 2-space indentation
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> FormResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Re-indent a JSON text buffer, keeping key order
pub fn format_json(text: &str) -> FormResult<String> {
    let value: Value = serde_json::from_str(text).map_err(|_| FormError::InvalidJson)?;
    print_json(&value)
}

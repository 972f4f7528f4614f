use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, trace};

use crate::config::FormConfig;
use crate::error::{ErrorDisplay, FormError, FormResult};
use crate::schema::{config_schema, ArraySchema, ObjectSchema, Presence, Rule, Schema, StringSchema};

/// Label used for the document itself in messages
const ROOT_LABEL: &str = "value";

/// Knobs for a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Stop at the first violation (the default) instead of collecting all of them
    pub abort_early: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self { abort_early: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Required,
    Forbidden,
    UnknownKey,
    TypeMismatch,
    Empty,
    EnumMismatch,
    InvalidValue,
    Duplicate,
    TooManyItems,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the config, rendered as `fields[0].choices[1].value`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    fn push_key(&mut self, key: &str) {
        self.0.push(PathSegment::Key(key.to_string()));
    }

    fn push_index(&mut self, index: usize) {
        self.0.push(PathSegment::Index(index));
    }

    fn pop(&mut self) {
        self.0.pop();
    }

    fn child_key(&self, key: &str) -> FieldPath {
        let mut path = self.clone();
        path.push_key(key);
        path
    }

    fn child_index(&self, index: usize) -> FieldPath {
        let mut path = self.clone();
        path.push_index(index);
        path
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One leaf constraint violation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationDetail {
    pub message: String,
    pub path: FieldPath,
    pub kind: ViolationKind,
}

/// A rejected document: the nested, path-qualified message plus every leaf violation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaViolation {
    pub message: String,
    pub details: Vec<ViolationDetail>,
}

impl SchemaViolation {
    /// The first leaf violation
    pub fn first(&self) -> Option<&ViolationDetail> {
        self.details.first()
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A composed message and the leaves it was built from
struct Failure {
    message: String,
    details: Vec<ViolationDetail>,
}

impl Failure {
    fn leaf(kind: ViolationKind, label: &str, text: &str, path: FieldPath) -> Self {
        let message = format!("\"{}\" {}", label, text);
        Failure {
            details: vec![ViolationDetail {
                message: message.clone(),
                path,
                kind,
            }],
            message,
        }
    }

    /// Fold nested failures under `"<prefix> fails because [...]"`
    fn wrap(prefix: String, inner: Vec<Failure>) -> Self {
        let reason = join_messages(&inner, ", ");
        Failure {
            message: format!("{} fails because [{}]", prefix, reason),
            details: inner.into_iter().flat_map(|f| f.details).collect(),
        }
    }
}

fn join_messages(failures: &[Failure], separator: &str) -> String {
    failures
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

struct Walker {
    options: ValidationOptions,
}

impl Walker {
    fn done(&self, failures: &[Failure]) -> bool {
        self.options.abort_early && !failures.is_empty()
    }

    fn check_rule(
        &self,
        rule: &Rule,
        value: Option<&Value>,
        label: &str,
        path: &mut FieldPath,
    ) -> Vec<Failure> {
        match (value, rule.presence) {
            (None, Presence::Required) => vec![Failure::leaf(
                ViolationKind::Required,
                label,
                "is required",
                path.clone(),
            )],
            (None, _) => Vec::new(),
            (Some(_), Presence::Forbidden) => vec![Failure::leaf(
                ViolationKind::Forbidden,
                label,
                "is not allowed",
                path.clone(),
            )],
            (Some(value), _) => self.check(&rule.schema, value, label, path),
        }
    }

    fn check(&self, schema: &Schema, value: &Value, label: &str, path: &mut FieldPath) -> Vec<Failure> {
        match schema {
            Schema::String(s) => check_string(s, value, label, path).into_iter().collect(),
            Schema::Boolean => {
                if value.is_boolean() {
                    Vec::new()
                } else {
                    vec![Failure::leaf(
                        ViolationKind::TypeMismatch,
                        label,
                        "must be a boolean",
                        path.clone(),
                    )]
                }
            }
            Schema::Object(o) => self.check_object(o, value, label, path),
            Schema::Array(a) => self.check_array(a, value, label, path),
        }
    }

    fn check_object(
        &self,
        schema: &ObjectSchema,
        value: &Value,
        label: &str,
        path: &mut FieldPath,
    ) -> Vec<Failure> {
        let object: &Map<String, Value> = match value {
            Value::Object(object) => object,
            _ => {
                return vec![Failure::leaf(
                    ViolationKind::TypeMismatch,
                    label,
                    "must be an object",
                    path.clone(),
                )]
            }
        };

        if schema.not_empty && object.is_empty() {
            return vec![Failure::leaf(
                ViolationKind::InvalidValue,
                label,
                "contains an invalid value",
                path.clone(),
            )];
        }

        let mut failures = Vec::new();

        // Declared keys, in declaration order
        for key in &schema.keys {
            let rule = key.resolve(object);
            path.push_key(key.name);
            let inner = self.check_rule(rule, object.get(key.name), key.name, path);
            path.pop();

            if !inner.is_empty() {
                failures.push(Failure::wrap(format!("child \"{}\"", key.name), inner));
                if self.done(&failures) {
                    return failures;
                }
            }
        }

        // Closed object: anything undeclared is rejected, in input order
        for name in object.keys() {
            if schema.key(name).is_none() {
                failures.push(Failure::leaf(
                    ViolationKind::UnknownKey,
                    name,
                    "is not allowed",
                    path.child_key(name),
                ));
                if self.done(&failures) {
                    return failures;
                }
            }
        }

        failures
    }

    fn check_array(
        &self,
        schema: &ArraySchema,
        value: &Value,
        label: &str,
        path: &mut FieldPath,
    ) -> Vec<Failure> {
        let items = match value {
            Value::Array(items) => items,
            _ => {
                return vec![Failure::leaf(
                    ViolationKind::TypeMismatch,
                    label,
                    "must be an array",
                    path.clone(),
                )]
            }
        };

        let mut failures = Vec::new();

        for (index, item) in items.iter().enumerate() {
            path.push_index(index);
            let inner = self.check(&schema.items, item, &index.to_string(), path);
            path.pop();

            if !inner.is_empty() {
                failures.push(Failure::wrap(
                    format!("\"{}\" at position {}", label, index),
                    inner,
                ));
                if self.done(&failures) {
                    return failures;
                }
            }
        }

        // Array rules only run once every item is valid
        if !failures.is_empty() {
            return failures;
        }

        if let Some(same) = schema.unique {
            if let Some(position) = first_duplicate(items, same) {
                failures.push(Failure::leaf(
                    ViolationKind::Duplicate,
                    label,
                    &format!("position {} contains a duplicate value", position),
                    path.child_index(position),
                ));
                if self.done(&failures) {
                    return failures;
                }
            }
        }

        if let Some(max) = schema.max {
            if items.len() > max {
                failures.push(Failure::leaf(
                    ViolationKind::TooManyItems,
                    label,
                    &format!("must contain less than or equal to {} items", max),
                    path.clone(),
                ));
            }
        }

        failures
    }
}

fn check_string(schema: &StringSchema, value: &Value, label: &str, path: &FieldPath) -> Option<Failure> {
    let text = value.as_str();

    if let (Some(valid), Some(text)) = (&schema.valid, text) {
        if valid.iter().any(|v| *v == text) {
            return None;
        }
    }

    if text == Some("") {
        return Some(Failure::leaf(
            ViolationKind::Empty,
            label,
            "is not allowed to be empty",
            path.clone(),
        ));
    }

    if text.is_none() {
        return Some(Failure::leaf(
            ViolationKind::TypeMismatch,
            label,
            "must be a string",
            path.clone(),
        ));
    }

    schema.valid.as_ref().map(|valid| {
        Failure::leaf(
            ViolationKind::EnumMismatch,
            label,
            &format!("must be one of [{}]", valid.join(", ")),
            path.clone(),
        )
    })
}

/// Index of the first item equal to an earlier one
fn first_duplicate(items: &[Value], same: fn(&Value, &Value) -> bool) -> Option<usize> {
    (1..items.len()).find(|&i| items[..i].iter().any(|earlier| same(earlier, &items[i])))
}

/// Check an already-parsed value against an arbitrary schema
pub fn check_against(schema: &Schema, value: &Value, options: ValidationOptions) -> Result<(), SchemaViolation> {
    let walker = Walker { options };
    let mut path = FieldPath::default();
    let failures = walker.check(schema, value, ROOT_LABEL, &mut path);

    if failures.is_empty() {
        return Ok(());
    }

    Err(SchemaViolation {
        message: join_messages(&failures, ". "),
        details: failures.into_iter().flat_map(|f| f.details).collect(),
    })
}

/// Validate an already-parsed document and convert it into a [`FormConfig`]
pub fn validate_value(value: &Value, options: ValidationOptions) -> FormResult<FormConfig> {
    if let Err(violation) = check_against(config_schema(), value, options) {
        debug!(
            violations = violation.details.len(),
            message = %violation.message,
            "config rejected by schema"
        );
        return Err(FormError::SchemaViolation(violation));
    }

    let config: FormConfig = serde_json::from_value(value.clone())?;
    trace!(fields = config.fields().len(), buttons = config.buttons().len(), "config accepted");
    Ok(config)
}

/// Parse and validate a config text buffer, stopping at the first violation
pub fn validate_config(text: &str) -> FormResult<FormConfig> {
    validate_config_with(text, ValidationOptions::default())
}

/// Parse and validate a config text buffer with explicit options
pub fn validate_config_with(text: &str, options: ValidationOptions) -> FormResult<FormConfig> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        debug!(error = %e, "config is not valid JSON");
        FormError::InvalidJson
    })?;
    validate_value(&value, options)
}

/// The `{config, error}` pair handed to the form view; exactly one side is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<FormConfig>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error"
    )]
    pub error: Option<FormError>,
}

fn serialize_error<S: Serializer>(error: &Option<FormError>, serializer: S) -> Result<S::Ok, S::Error> {
    error.as_ref().map(FormError::to_display).serialize(serializer)
}

impl ValidationOutcome {
    pub fn from_text(text: &str) -> Self {
        validate_config(text).into()
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_display(&self) -> Option<ErrorDisplay> {
        self.error.as_ref().map(FormError::to_display)
    }
}

impl From<FormResult<FormConfig>> for ValidationOutcome {
    fn from(result: FormResult<FormConfig>) -> Self {
        match result {
            Ok(config) => ValidationOutcome {
                config: Some(config),
                error: None,
            },
            Err(error) => ValidationOutcome {
                config: None,
                error: Some(error),
            },
        }
    }
}

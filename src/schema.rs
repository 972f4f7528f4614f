//! Declarative description of a valid form configuration.
//!
//! [`config_schema`] is the one canonical definition: the validator walks it to
//! check documents and the introspector walks it to produce documentation, so
//! the two cannot drift apart.

use serde_json::Value;
use std::sync::OnceLock;

use crate::config::{ButtonType, FieldType, Intent};

/// Maximum number of buttons a form may declare
pub const MAX_BUTTONS: usize = 5;

/// Equality used by an array uniqueness rule
pub type Comparator = fn(&Value, &Value) -> bool;

#[derive(Debug, Clone)]
pub enum Schema {
    String(StringSchema),
    Boolean,
    Object(ObjectSchema),
    Array(ArraySchema),
}

#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    /// Allowed values; `None` accepts any non-empty string
    pub valid: Option<Vec<&'static str>>,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    /// Named type used for documentation components
    pub class_name: Option<&'static str>,
    pub keys: Vec<KeySchema>,
    /// Reject `{}`
    pub not_empty: bool,
}

#[derive(Clone)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub unique: Option<Comparator>,
    pub max: Option<usize>,
}

impl std::fmt::Debug for ArraySchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArraySchema")
            .field("items", &self.items)
            .field("unique", &self.unique.is_some())
            .field("max", &self.max)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Optional,
    Required,
    Forbidden,
}

/// Presence plus the schema a present value must satisfy
#[derive(Debug, Clone)]
pub struct Rule {
    pub presence: Presence,
    pub schema: Schema,
}

/// How a key's rule is chosen
#[derive(Debug, Clone)]
pub enum KeyRule {
    Plain(Rule),
    /// Pick `then` when the sibling key equals `is`, otherwise `otherwise`
    When {
        sibling: &'static str,
        is: &'static str,
        then: Rule,
        otherwise: Rule,
    },
}

#[derive(Debug, Clone)]
pub struct KeySchema {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub rule: KeyRule,
}

impl KeySchema {
    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            description: None,
            rule: KeyRule::Plain(Rule {
                presence: Presence::Optional,
                schema,
            }),
        }
    }

    pub fn required(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            description: None,
            rule: KeyRule::Plain(Rule {
                presence: Presence::Required,
                schema,
            }),
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Resolve the rule that applies given the sibling values of `object`
    pub fn resolve<'a>(&'a self, object: &serde_json::Map<String, Value>) -> &'a Rule {
        match &self.rule {
            KeyRule::Plain(rule) => rule,
            KeyRule::When {
                sibling,
                is,
                then,
                otherwise,
            } => match object.get(*sibling) {
                Some(Value::String(s)) if s == is => then,
                _ => otherwise,
            },
        }
    }
}

impl ObjectSchema {
    pub fn key(&self, name: &str) -> Option<&KeySchema> {
        self.keys.iter().find(|k| k.name == name)
    }
}

impl Schema {
    pub fn string() -> Self {
        Schema::String(StringSchema::default())
    }

    pub fn one_of(values: Vec<&'static str>) -> Self {
        Schema::String(StringSchema {
            valid: Some(values),
        })
    }

    pub fn array(items: Schema) -> ArraySchema {
        ArraySchema {
            items: Box::new(items),
            unique: None,
            max: None,
        }
    }
}

impl ArraySchema {
    pub fn unique(mut self, comparator: Comparator) -> Self {
        self.unique = Some(comparator);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }
}

impl From<ArraySchema> for Schema {
    fn from(array: ArraySchema) -> Self {
        Schema::Array(array)
    }
}

/// Two fields collide only when both carry a non-empty `key` and the keys match
pub fn same_field_key(a: &Value, b: &Value) -> bool {
    match (non_empty_str(a, "key"), non_empty_str(b, "key")) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Two choices collide when their `value`s match
pub fn same_choice_value(a: &Value, b: &Value) -> bool {
    a.get("value") == b.get("value")
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn choice_schema() -> Schema {
    Schema::Object(ObjectSchema {
        class_name: Some("Choice"),
        keys: vec![
            KeySchema::optional("label", Schema::string()),
            KeySchema::required("value", Schema::string()),
        ],
        not_empty: false,
    })
}

fn field_schema() -> Schema {
    let types = FieldType::ALL.iter().map(|t| t.as_str()).collect();

    let choices = KeySchema {
        name: "choices",
        description: Some("required only if type of Field is radio"),
        rule: KeyRule::When {
            sibling: "type",
            is: FieldType::Radio.as_str(),
            then: Rule {
                presence: Presence::Required,
                schema: Schema::array(choice_schema())
                    .unique(same_choice_value)
                    .into(),
            },
            otherwise: Rule {
                presence: Presence::Forbidden,
                schema: Schema::array(choice_schema()).into(),
            },
        },
    };

    Schema::Object(ObjectSchema {
        class_name: Some("Field"),
        keys: vec![
            KeySchema::required("type", Schema::one_of(types)),
            KeySchema::optional("label", Schema::string()),
            KeySchema::optional("required", Schema::Boolean),
            KeySchema::optional("placeholder", Schema::string())
                .describe("Can be used when type of Field is number, date, text or textarea"),
            KeySchema::optional("key", Schema::string())
                .describe("Unique identity of the Field within the form"),
            choices,
        ],
        not_empty: false,
    })
}

fn button_schema() -> Schema {
    Schema::Object(ObjectSchema {
        class_name: Some("Button"),
        keys: vec![
            KeySchema::optional(
                "type",
                Schema::one_of(ButtonType::ALL.iter().map(|t| t.as_str()).collect()),
            ),
            KeySchema::optional("label", Schema::string()),
            KeySchema::optional(
                "color",
                Schema::one_of(Intent::ALL.iter().map(|i| i.as_str()).collect()),
            ),
        ],
        not_empty: true,
    })
}

fn build_config_schema() -> Schema {
    Schema::Object(ObjectSchema {
        class_name: None,
        keys: vec![
            KeySchema::optional("title", Schema::string()),
            KeySchema::optional("subtitle", Schema::string()),
            KeySchema::optional(
                "fields",
                Schema::array(field_schema()).unique(same_field_key).into(),
            ),
            KeySchema::optional(
                "buttons",
                Schema::array(button_schema()).max(MAX_BUTTONS).into(),
            ),
        ],
        not_empty: false,
    })
}

/// The form configuration schema, built once per process
pub fn config_schema() -> &'static Schema {
    static CONFIG_SCHEMA: OnceLock<Schema> = OnceLock::new();
    CONFIG_SCHEMA.get_or_init(build_config_schema)
}

//! OpenAPI-style description of the config schema, for reference docs.
//!
//! Generated from [`config_schema`](crate::schema::config_schema) rather than
//! written by hand, so documentation always matches what the validator enforces.
//! Objects with a class name become entries under `components.schemas` and are
//! referenced with `$ref`.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

use crate::error::FormResult;
use crate::schema::{config_schema, KeyRule, KeySchema, ObjectSchema, Presence, Schema};
use crate::submission::print_json;

const COMPONENT_REF_PREFIX: &str = "#/components/schemas/";

/// Top-level schema plus its named components
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDocument {
    pub swagger: Value,
    pub components: Components,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Components {
    pub schemas: Map<String, Value>,
}

impl SchemaDocument {
    pub fn component(&self, name: &str) -> Option<&Value> {
        self.components.schemas.get(name)
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.schemas.keys().map(String::as_str)
    }
}

/// Convert any schema into a document
pub fn describe(schema: &Schema) -> SchemaDocument {
    let mut schemas = Map::new();
    let swagger = convert(schema, &mut schemas);
    SchemaDocument {
        swagger,
        components: Components { schemas },
    }
}

/// The config schema document, computed once per process
pub fn schema_document() -> &'static SchemaDocument {
    static DOCUMENT: OnceLock<SchemaDocument> = OnceLock::new();
    DOCUMENT.get_or_init(|| describe(config_schema()))
}

/// [`schema_document`] as 2-space pretty JSON
pub fn schema_document_json() -> FormResult<String> {
    print_json(schema_document())
}

fn convert(schema: &Schema, components: &mut Map<String, Value>) -> Value {
    match schema {
        Schema::String(s) => {
            let mut out = json!({ "type": "string" });
            if let Some(valid) = &s.valid {
                out["enum"] = json!(valid);
            }
            out
        }
        Schema::Boolean => json!({ "type": "boolean" }),
        Schema::Array(a) => {
            let mut out = json!({
                "type": "array",
                "items": convert(&a.items, components),
            });
            if let Some(max) = a.max {
                out["maxItems"] = json!(max);
            }
            if a.unique.is_some() {
                out["uniqueItems"] = json!(true);
            }
            out
        }
        Schema::Object(o) => match o.class_name {
            Some(name) => {
                if !components.contains_key(name) {
                    // Claim the slot first so components list in discovery order
                    components.insert(name.to_string(), Value::Null);
                    let body = convert_object(o, components);
                    components.insert(name.to_string(), body);
                }
                json!({ "$ref": format!("{}{}", COMPONENT_REF_PREFIX, name) })
            }
            None => convert_object(o, components),
        },
    }
}

fn convert_object(object: &ObjectSchema, components: &mut Map<String, Value>) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for key in &object.keys {
        properties.insert(key.name.to_string(), convert_key(key, components));
        if let KeyRule::Plain(rule) = &key.rule {
            if rule.presence == Presence::Required {
                required.push(key.name);
            }
        }
    }

    let mut out = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        out["required"] = json!(required);
    }
    out["additionalProperties"] = json!(false);
    if object.not_empty {
        out["minProperties"] = json!(1);
    }
    out
}

fn convert_key(key: &KeySchema, components: &mut Map<String, Value>) -> Value {
    // Conditional keys are documented by the branch in which they may appear
    let schema = match &key.rule {
        KeyRule::Plain(rule) => &rule.schema,
        KeyRule::When { then, .. } => &then.schema,
    };

    let mut out = convert(schema, components);
    if let Some(description) = key.description {
        out["description"] = json!(description);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_are_named_types() {
        let names: Vec<_> = schema_document().component_names().collect();
        assert_eq!(names, vec!["Field", "Choice", "Button"]);
    }

    #[test]
    fn test_top_level_schema() {
        let swagger = &schema_document().swagger;
        assert_eq!(swagger["type"], "object");
        assert_eq!(swagger["additionalProperties"], false);
        assert_eq!(swagger["properties"]["title"], json!({ "type": "string" }));
        assert_eq!(
            swagger["properties"]["fields"],
            json!({
                "type": "array",
                "items": { "$ref": "#/components/schemas/Field" },
                "uniqueItems": true
            })
        );
        assert_eq!(
            swagger["properties"]["buttons"],
            json!({
                "type": "array",
                "items": { "$ref": "#/components/schemas/Button" },
                "maxItems": 5
            })
        );
        assert!(swagger.get("required").is_none());
    }

    #[test]
    fn test_field_component() {
        let field = schema_document().component("Field").unwrap();
        assert_eq!(field["required"], json!(["type"]));
        assert_eq!(
            field["properties"]["type"]["enum"],
            json!(["number", "date", "text", "textarea", "checkbox", "radio"])
        );
        assert_eq!(
            field["properties"]["choices"]["description"],
            "required only if type of Field is radio"
        );
        assert_eq!(
            field["properties"]["choices"]["items"],
            json!({ "$ref": "#/components/schemas/Choice" })
        );
    }

    #[test]
    fn test_button_component() {
        let button = schema_document().component("Button").unwrap();
        assert_eq!(button["minProperties"], 1);
        assert_eq!(
            button["properties"]["color"]["enum"],
            json!(["none", "primary", "success", "warning", "danger"])
        );
        assert!(button.get("required").is_none());
    }

    #[test]
    fn test_document_is_deterministic() {
        assert_eq!(describe(config_schema()), *schema_document());
        let first = schema_document_json().unwrap();
        let second = print_json(&describe(config_schema())).unwrap();
        assert_eq!(first, second);
    }
}

use serde_json::Value;
use tracing::debug;

use crate::config::{ButtonType, FieldDescriptor, FormConfig};
use crate::date::parse_date_input;
use crate::error::{FormError, FormResult};
use crate::submission::{index_to_key, map_submit_data, print_json, SubmissionRecord, SubmittedValues};

/// What pressing a button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Submit,
    Reset,
    /// Untyped buttons render but do nothing
    None,
}

impl From<Option<ButtonType>> for ButtonAction {
    fn from(button_type: Option<ButtonType>) -> Self {
        match button_type {
            Some(ButtonType::Submit) => ButtonAction::Submit,
            Some(ButtonType::Reset) => ButtonAction::Reset,
            None => ButtonAction::None,
        }
    }
}

/// Live values of one rendered form.
///
/// Values are stored under synthetic identifiers exactly as the mapper expects
/// them; a field with no stored value is omitted from the submission.
#[derive(Debug, Clone)]
pub struct FormSession<'a> {
    config: &'a FormConfig,
    values: SubmittedValues,
    last_result: Option<Vec<SubmissionRecord>>,
}

impl<'a> FormSession<'a> {
    pub fn new(config: &'a FormConfig) -> Self {
        Self {
            config,
            values: SubmittedValues::new(),
            last_result: None,
        }
    }

    pub fn config(&self) -> &FormConfig {
        self.config
    }

    fn field(&self, index: usize) -> FormResult<&'a FieldDescriptor> {
        let config: &'a FormConfig = self.config;
        let fields = config.fields();
        fields.get(index).ok_or_else(|| FormError::StaleFieldKey {
            key: index_to_key(index),
            index,
            field_count: fields.len(),
        })
    }

    /// Apply the field's parse hook to a raw widget value and store the result
    pub fn set_value(&mut self, index: usize, raw: Value) -> FormResult<()> {
        let field = self.field(index)?;
        let key = index_to_key(index);

        match parse_field_value(field, raw)? {
            Some(value) => {
                self.values.insert(key, value);
            }
            None => {
                self.values.remove(&key);
            }
        }
        Ok(())
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(&index_to_key(index))
    }

    pub fn values(&self) -> &SubmittedValues {
        &self.values
    }

    pub fn reset(&mut self) {
        self.values.clear();
    }

    /// Map the current values into the ordered result and keep it
    pub fn submit(&mut self) -> FormResult<&[SubmissionRecord]> {
        let records = map_submit_data(self.config.fields(), &self.values)?;
        debug!(records = records.len(), "form submitted");
        Ok(self.last_result.insert(records).as_slice())
    }

    pub fn last_result(&self) -> Option<&[SubmissionRecord]> {
        self.last_result.as_deref()
    }

    /// The last submission as 2-space pretty JSON
    pub fn result_json(&self) -> FormResult<Option<String>> {
        self.last_result.as_ref().map(print_json).transpose()
    }

    /// Press the button at `index` and report what it did
    pub fn press(&mut self, index: usize) -> FormResult<ButtonAction> {
        let buttons = self.config.buttons();
        let button = buttons.get(index).ok_or(FormError::UnknownButton {
            index,
            button_count: buttons.len(),
        })?;

        let action = ButtonAction::from(button.button_type);
        match action {
            ButtonAction::Submit => {
                self.submit()?;
            }
            ButtonAction::Reset => self.reset(),
            ButtonAction::None => {}
        }
        Ok(action)
    }
}

/// Convert a raw widget value into what gets stored, or `None` to omit the field
pub fn parse_field_value(field: &FieldDescriptor, raw: Value) -> FormResult<Option<Value>> {
    match field {
        FieldDescriptor::Checkbox(_) => Ok(if is_falsy(&raw) { None } else { Some(raw) }),
        FieldDescriptor::Date(_) => match raw {
            Value::Null => Ok(None),
            Value::String(text) => Ok(parse_date_input(&text)?.map(Value::String)),
            other => Err(FormError::InvalidDate {
                value: other.to_string(),
            }),
        },
        FieldDescriptor::Radio(radio) => match raw {
            Value::Null => Ok(None),
            Value::String(text) if text.is_empty() => Ok(None),
            Value::String(text) => {
                if radio.choices.iter().any(|c| c.value == text) {
                    Ok(Some(Value::String(text)))
                } else {
                    Err(FormError::InvalidChoice {
                        field: field.label().unwrap_or_default().to_string(),
                        value: text,
                    })
                }
            }
            other => Err(FormError::InvalidChoice {
                field: field.label().unwrap_or_default().to_string(),
                value: other.to_string(),
            }),
        },
        FieldDescriptor::Number(_) | FieldDescriptor::Text(_) | FieldDescriptor::TextArea(_) => {
            Ok(match raw {
                Value::Null => None,
                Value::String(text) if text.is_empty() => None,
                other => Some(other),
            })
        }
    }
}

/// `false`, `null`, `""` and zero count as an unchecked box
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(text) => text.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate_config;
    use serde_json::json;

    fn config(value: Value) -> FormConfig {
        validate_config(&value.to_string()).unwrap()
    }

    #[test]
    fn test_text_value_and_reset() {
        let config = config(json!({
            "fields": [{ "type": "text", "label": "text-label" }],
            "buttons": [{ "type": "reset", "label": "Reset" }, { "type": "submit", "label": "Go" }]
        }));
        let mut session = FormSession::new(&config);

        session.set_value(0, json!("hello")).unwrap();
        assert_eq!(session.press(1).unwrap(), ButtonAction::Submit);
        assert_eq!(
            session.result_json().unwrap().unwrap(),
            print_json(&json!([{ "label": "text-label", "value": "hello" }])).unwrap()
        );

        assert_eq!(session.press(0).unwrap(), ButtonAction::Reset);
        assert!(session.submit().unwrap().is_empty());
    }

    #[test]
    fn test_empty_text_omitted() {
        let config = config(json!({ "fields": [{ "type": "textarea" }] }));
        let mut session = FormSession::new(&config);
        session.set_value(0, json!("x")).unwrap();
        session.set_value(0, json!("")).unwrap();
        assert!(session.value(0).is_none());
    }

    #[test]
    fn test_checkbox_toggle() {
        let config = config(json!({ "fields": [{ "type": "checkbox", "label": "c" }] }));
        let mut session = FormSession::new(&config);

        session.set_value(0, json!(true)).unwrap();
        assert_eq!(session.submit().unwrap().len(), 1);

        session.set_value(0, json!(false)).unwrap();
        assert!(session.submit().unwrap().is_empty());
    }

    #[test]
    fn test_checkbox_drops_falsy_values() {
        let config = config(json!({ "fields": [{ "type": "checkbox", "label": "c" }] }));
        let mut session = FormSession::new(&config);

        for raw in [json!(""), json!(0), json!(0.0), json!(false), Value::Null] {
            session.set_value(0, json!(true)).unwrap();
            session.set_value(0, raw.clone()).unwrap();
            assert_eq!(session.value(0), None, "{} should clear the checkbox", raw);
        }

        session.set_value(0, json!("on")).unwrap();
        assert_eq!(session.value(0), Some(&json!("on")));
    }

    #[test]
    fn test_date_normalized() {
        let config = config(json!({ "fields": [{ "type": "date", "label": "d" }] }));
        let mut session = FormSession::new(&config);

        session.set_value(0, json!("1985-07-03")).unwrap();
        assert_eq!(session.value(0), Some(&json!("03/07/1985")));

        session.set_value(0, Value::Null).unwrap();
        assert_eq!(session.value(0), None);

        assert!(matches!(
            session.set_value(0, json!(12)),
            Err(FormError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_radio_must_match_a_choice() {
        let config = config(json!({
            "fields": [{
                "type": "radio",
                "label": "r",
                "choices": [{ "value": "a" }, { "value": "b" }]
            }]
        }));
        let mut session = FormSession::new(&config);

        session.set_value(0, json!("b")).unwrap();
        assert_eq!(session.value(0), Some(&json!("b")));
        assert_eq!(
            session.set_value(0, json!("c")),
            Err(FormError::InvalidChoice {
                field: "r".to_string(),
                value: "c".to_string(),
            })
        );
    }

    #[test]
    fn test_number_kept_as_number() {
        let config = config(json!({ "fields": [{ "type": "number", "label": "n" }] }));
        let mut session = FormSession::new(&config);
        session.set_value(0, json!(5789)).unwrap();
        let result = session.submit().unwrap();
        assert_eq!(result[0].value, json!(5789));
    }

    #[test]
    fn test_out_of_range_field() {
        let config = config(json!({}));
        let mut session = FormSession::new(&config);
        assert!(matches!(
            session.set_value(0, json!("x")),
            Err(FormError::StaleFieldKey { index: 0, field_count: 0, .. })
        ));
    }

    #[test]
    fn test_untyped_button_does_nothing() {
        let config = config(json!({ "buttons": [{ "label": "OK" }] }));
        let mut session = FormSession::new(&config);
        assert_eq!(session.press(0).unwrap(), ButtonAction::None);
        assert!(session.last_result().is_none());
        assert!(session.result_json().unwrap().is_none());
    }
}

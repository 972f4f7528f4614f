use tracing::debug;

use crate::config::FormConfig;
use crate::error::{FormError, FormResult};
use crate::session::FormSession;
use crate::submission::format_json;
use crate::validator::{validate_config, ValidationOutcome};

/// Demo configuration the editor starts with
pub const DEFAULT_CONFIG: &str = r#"{
  "title": "Fancy form",
  "subtitle": "Quite fancier form description",
  "fields": [
    { "label": "Numberic form field", "type": "number", "required": true },
    { "label": "Text form field", "type": "text", "required": true },
    { "label": "Textarea text field filled with text", "type": "textarea" },
    {
      "label": "Textarea text field filled with text",
      "type": "textarea",
      "placeholder": "duplicate of previous one",
      "required": true
    },
    { "label": "Date of birth", "type": "date", "required": true },
    { "label": "Date of death", "type": "date" },
    { "label": "Checkbox field", "type": "checkbox" },
    {
      "label": "Radio fields",
      "type": "radio",
      "choices": [
        { "label": "Kot", "value": "kot" },
        { "label": "Kit", "value": "kit" },
        { "label": "Koshka", "value": "koshka" },
        { "label": "Koshak", "value": "koshak" }
      ]
    }
  ],
  "buttons": [
    { "label": "Cancel", "type": "reset" },
    { "label": "OK" },
    { "label": "Confirm", "color": "success", "type": "submit" }
  ]
}"#;

/// The raw config text of one editing session and its current validation result.
///
/// The buffer is replaced wholesale on every edit and re-validated from scratch.
#[derive(Debug, Clone)]
pub struct ConfigEditor {
    text: String,
    outcome: ValidationOutcome,
}

impl Default for ConfigEditor {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG)
    }
}

impl ConfigEditor {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let outcome = validate_config(&text).into();
        Self { text, outcome }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.outcome = validate_config(&self.text).into();
        if let Some(error) = &self.outcome.error {
            debug!(error = %error, "config edit has errors");
        }
    }

    pub fn outcome(&self) -> &ValidationOutcome {
        &self.outcome
    }

    pub fn config(&self) -> Option<&FormConfig> {
        self.outcome.config.as_ref()
    }

    pub fn error(&self) -> Option<&FormError> {
        self.outcome.error.as_ref()
    }

    /// The form view is only reachable while the config is valid
    pub fn result_enabled(&self) -> bool {
        self.outcome.is_valid()
    }

    /// Re-indent the buffer; refused while it has errors
    pub fn prettify(&mut self) -> FormResult<()> {
        if !self.outcome.is_valid() {
            return Err(FormError::PrettifyDisabled);
        }
        let formatted = format_json(&self.text)?;
        self.set_text(formatted);
        Ok(())
    }

    /// Open a form session on the current config, if it is valid
    pub fn session(&self) -> Option<FormSession<'_>> {
        self.config().map(FormSession::new)
    }
}

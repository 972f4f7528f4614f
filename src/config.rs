use serde::{Deserialize, Serialize};

/// A validated form configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ButtonDescriptor>>,
}

impl FormConfig {
    /// Declared fields in declaration order (empty when `fields` is absent)
    pub fn fields(&self) -> &[FieldDescriptor] {
        self.fields.as_deref().unwrap_or_default()
    }

    /// Declared buttons in declaration order (empty when `buttons` is absent)
    pub fn buttons(&self) -> &[ButtonDescriptor] {
        self.buttons.as_deref().unwrap_or_default()
    }
}

/// One declared form field, tagged by its `type`.
///
/// Only `Radio` carries `choices`; every other variant shares [`FieldCommon`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldDescriptor {
    Number(FieldCommon),
    Date(FieldCommon),
    Text(FieldCommon),
    #[serde(rename = "textarea")]
    TextArea(FieldCommon),
    Checkbox(FieldCommon),
    Radio(RadioField),
}

/// Properties accepted by every field type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldCommon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Identity used by the list-level uniqueness rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Radio field - the only type with a choice list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioField {
    #[serde(flatten)]
    pub common: FieldCommon,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub value: String,
}

/// Field type names, in the order the schema lists them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Number,
    Date,
    Text,
    TextArea,
    Checkbox,
    Radio,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Number,
        FieldType::Date,
        FieldType::Text,
        FieldType::TextArea,
        FieldType::Checkbox,
        FieldType::Radio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Text => "text",
            FieldType::TextArea => "textarea",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
        }
    }

    /// Whether a placeholder is rendered for this type
    pub fn supports_placeholder(self) -> bool {
        matches!(
            self,
            FieldType::Number | FieldType::Date | FieldType::Text | FieldType::TextArea
        )
    }
}

impl FieldDescriptor {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldDescriptor::Number(_) => FieldType::Number,
            FieldDescriptor::Date(_) => FieldType::Date,
            FieldDescriptor::Text(_) => FieldType::Text,
            FieldDescriptor::TextArea(_) => FieldType::TextArea,
            FieldDescriptor::Checkbox(_) => FieldType::Checkbox,
            FieldDescriptor::Radio(_) => FieldType::Radio,
        }
    }

    pub fn common(&self) -> &FieldCommon {
        match self {
            FieldDescriptor::Number(c)
            | FieldDescriptor::Date(c)
            | FieldDescriptor::Text(c)
            | FieldDescriptor::TextArea(c)
            | FieldDescriptor::Checkbox(c) => c,
            FieldDescriptor::Radio(r) => &r.common,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.common().label.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.common().key.as_deref()
    }

    /// Declared but not enforced on submission
    pub fn is_required(&self) -> bool {
        self.common().required.unwrap_or(false)
    }

    /// Placeholder, only for types that render one
    pub fn placeholder(&self) -> Option<&str> {
        if self.field_type().supports_placeholder() {
            self.common().placeholder.as_deref()
        } else {
            None
        }
    }

    pub fn choices(&self) -> &[Choice] {
        match self {
            FieldDescriptor::Radio(r) => &r.choices,
            _ => &[],
        }
    }
}

/// One declared action control
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonDescriptor {
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    pub button_type: Option<ButtonType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Intent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonType {
    Submit,
    Reset,
}

impl ButtonType {
    pub const ALL: [ButtonType; 2] = [ButtonType::Submit, ButtonType::Reset];

    pub fn as_str(self) -> &'static str {
        match self {
            ButtonType::Submit => "submit",
            ButtonType::Reset => "reset",
        }
    }
}

/// Semantic intent of a button's color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    None,
    Primary,
    Success,
    Warning,
    Danger,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::None,
        Intent::Primary,
        Intent::Success,
        Intent::Warning,
        Intent::Danger,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::None => "none",
            Intent::Primary => "primary",
            Intent::Success => "success",
            Intent::Warning => "warning",
            Intent::Danger => "danger",
        }
    }
}

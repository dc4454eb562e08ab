// Strongly-typed schema model. Decoded from JSON by `load`, never from raw text here.
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEXTAREA_ROWS: u32 = 3;

/// Ordered forest of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub nodes: Vec<FieldNode>,
}

/// One schema element, discriminated by its `type` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldNode {
    Section(Section),
    Text(InputField),
    Email(InputField),
    Password(InputField),
    Number(InputField),
    Select(SelectField),
    Textarea(TextAreaField),
    /// Any `type` this build does not know. Carries nothing and renders nothing.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    pub fields: Vec<FieldNode>,
}

/// Shared shape of `text`, `email`, `password` and `number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectField {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    /// Missing `options` is an empty choice list, not an error.
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAreaField {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<i64>,
}

impl TextAreaField {
    /// Declared row count, or the default when absent or non-positive.
    pub fn resolved_rows(&self) -> u32 {
        match self.rows {
            Some(rows) if rows > 0 => u32::try_from(rows).unwrap_or(u32::MAX),
            _ => DEFAULT_TEXTAREA_ROWS,
        }
    }
}

impl FieldNode {
    /// `None` only for [`FieldNode::Unknown`].
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Section(s) => Some(&s.name),
            Self::Text(f) | Self::Email(f) | Self::Password(f) | Self::Number(f) => Some(&f.name),
            Self::Select(f) => Some(&f.name),
            Self::Textarea(f) => Some(&f.name),
            Self::Unknown => None,
        }
    }

    /// The wire `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Section(_) => "section",
            Self::Text(_) => "text",
            Self::Email(_) => "email",
            Self::Password(_) => "password",
            Self::Number(_) => "number",
            Self::Select(_) => "select",
            Self::Textarea(_) => "textarea",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section(_))
    }
}

impl Schema {
    pub fn new(nodes: Vec<FieldNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl From<Vec<FieldNode>> for Schema {
    fn from(nodes: Vec<FieldNode>) -> Self {
        Self { nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(v: serde_json::Value) -> Schema {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn decodes_nested_sections() {
        let schema = decode(json!([
            {"type": "section", "name": "p", "label": "P", "fields": [
                {"type": "text", "name": "first", "label": "First", "required": true}
            ]}
        ]));
        let FieldNode::Section(section) = &schema.nodes[0] else {
            panic!("expected section, got {:?}", schema.nodes[0]);
        };
        assert_eq!(section.label, "P");
        assert_eq!(
            section.fields,
            vec![FieldNode::Text(InputField {
                name: "first".into(),
                label: "First".into(),
                required: true,
                placeholder: None,
            })]
        );
    }

    #[test]
    fn unknown_type_decodes_to_unknown() {
        let schema = decode(json!([{"type": "unknown", "name": "z", "label": "Z"}]));
        assert_eq!(schema.nodes, vec![FieldNode::Unknown]);
        assert_eq!(schema.nodes[0].name(), None);
    }

    #[test]
    fn select_without_options_is_empty() {
        let schema = decode(json!([{"type": "select", "name": "s", "label": "S"}]));
        let FieldNode::Select(select) = &schema.nodes[0] else { panic!() };
        assert!(select.options.is_empty());
        assert!(!select.required);
    }

    #[test]
    fn textarea_rows_default_when_absent_or_non_positive() {
        let area = |rows| TextAreaField {
            name: "t".into(),
            label: String::new(),
            required: false,
            placeholder: None,
            rows,
        };
        assert_eq!(area(None).resolved_rows(), 3);
        assert_eq!(area(Some(0)).resolved_rows(), 3);
        assert_eq!(area(Some(-2)).resolved_rows(), 3);
        assert_eq!(area(Some(4)).resolved_rows(), 4);
    }

    #[test]
    fn section_without_fields_is_rejected() {
        let res = serde_json::from_value::<Schema>(json!([{"type": "section", "name": "p"}]));
        assert!(res.is_err());
    }
}

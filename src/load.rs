//! Text → [`Schema`]: parse, preprocess, shape-check, decode.
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{SchemaError, SchemaShapeError};
use crate::path_de::from_value_with_path;
use crate::schema::Schema;
use crate::validate::{self, Limits};

#[derive(Clone, Debug, Default)]
pub struct SchemaLoader {
    limits: Limits,
    /// JSON Pointer selecting the schema inside a larger document (e.g. /data/form)
    json_pointer: Option<String>,
    /// jq filter applied after the pointer; its first output is the schema
    jq_expr: Option<String>,
}

impl SchemaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_json_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.json_pointer = Some(pointer.into());
        self
    }

    pub fn with_jq_expr(mut self, expr: impl Into<String>) -> Self {
        self.jq_expr = Some(expr.into());
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn load_str(&self, src: &str) -> Result<Schema, SchemaError> {
        let value = serde_json::from_str::<Value>(src)?;
        self.load_value(value)
    }

    pub fn load_value(&self, value: Value) -> Result<Schema, SchemaError> {
        let value = self.preprocess(value)?;
        let nodes = match value {
            Value::Array(nodes) => nodes,
            other => {
                return Err(SchemaShapeError::NotAnArray { found: validate::json_type(&other) }.into());
            }
        };

        for issue in validate::check(&nodes, &self.limits)? {
            warn!(%issue, "schema issue");
        }

        let schema: Schema = from_value_with_path(Value::Array(nodes))?;
        info!(nodes = schema.nodes.len(), "schema loaded");
        Ok(schema)
    }

    fn preprocess(&self, mut value: Value) -> Result<Value, SchemaError> {
        if let Some(pointer) = self.json_pointer.as_deref() {
            value = value
                .pointer_mut(pointer)
                .map(Value::take)
                .ok_or_else(|| SchemaError::Filter(format!("JSON pointer `{pointer}` selected nothing")))?;
        }
        if let Some(expr) = self.jq_expr.as_deref() {
            let outputs = crate::jq_exec::run_jaq(expr, &value)
                .map_err(|e| SchemaError::Filter(format!("{e:#}")))?;
            if outputs.len() > 1 {
                debug!(count = outputs.len(), "jq produced several outputs; using the first");
            }
            value = outputs
                .into_iter()
                .next()
                .ok_or_else(|| SchemaError::Filter(format!("jq expression `{expr}` produced no output")))?;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldNode;
    use serde_json::json;

    #[test]
    fn loads_simple_sample() {
        let src = serde_json::to_string(&crate::samples::simple_schema()).unwrap();
        let schema = SchemaLoader::new().load_str(&src).unwrap();
        assert_eq!(schema.nodes.len(), 2);
        assert!(matches!(schema.nodes[0], FieldNode::Email(_)));
        assert!(matches!(schema.nodes[1], FieldNode::Password(_)));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = SchemaLoader::new().load_str("[{").unwrap_err();
        assert!(matches!(err, SchemaError::Parse(_)), "{err:?}");
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn non_array_root_is_a_shape_error() {
        let err = SchemaLoader::new().load_str(r#"{"type": "text"}"#).unwrap_err();
        assert!(
            matches!(err, SchemaError::Shape(SchemaShapeError::NotAnArray { found: "object" })),
            "{err:?}"
        );
        assert!(err.is_invalid_schema());
        assert_eq!(
            err.to_string(),
            "schema must be an array of field objects, found object"
        );
    }

    #[test]
    fn json_pointer_selects_subdocument() {
        let loader = SchemaLoader::new().with_json_pointer("/data/form");
        let schema = loader
            .load_value(json!({"data": {"form": [{"type": "text", "name": "a", "label": "A"}]}}))
            .unwrap();
        assert_eq!(schema.nodes.len(), 1);

        let err = loader.load_value(json!({"data": {}})).unwrap_err();
        assert!(matches!(err, SchemaError::Filter(_)));
        assert!(!err.is_invalid_schema());
    }

    #[test]
    fn jq_expr_selects_subdocument() {
        let loader = SchemaLoader::new().with_jq_expr(".pages[0].fields");
        let schema = loader
            .load_value(json!({"pages": [{"fields": [{"type": "number", "name": "n", "label": "N"}]}]}))
            .unwrap();
        assert!(matches!(schema.nodes[0], FieldNode::Number(_)));

        let err = SchemaLoader::new().with_jq_expr("empty").load_value(json!([])).unwrap_err();
        assert!(matches!(err, SchemaError::Filter(_)), "{err:?}");
    }

    #[test]
    fn strict_mode_rejects_duplicates() {
        let doc = json!([
            {"type": "text", "name": "a", "label": "A"},
            {"type": "text", "name": "a", "label": "A"}
        ]);
        assert!(SchemaLoader::new().load_value(doc.clone()).is_ok());
        let strict = SchemaLoader::new().with_limits(Limits { strict: true, ..Limits::default() });
        assert!(matches!(
            strict.load_value(doc),
            Err(SchemaError::Shape(SchemaShapeError::DuplicateName { .. }))
        ));
    }

    #[test]
    fn empty_array_is_an_empty_schema() {
        assert!(SchemaLoader::new().load_str("[]").unwrap().is_empty());
    }
}

//! Structural checks over the raw JSON, run before typed decoding.
//!
//! Anything serde can report with a location (missing `name`, wrong value
//! types) is left to the decoder. This pass only covers what the typed model
//! cannot see or should not have to survive: leaves carrying `fields`,
//! runaway nesting, and names that break dotted addressing.
use std::collections::HashSet;

use serde_json::Value;

use crate::error::SchemaShapeError;
use crate::path::{FieldPath, SEPARATOR};

// ------------------------------- Policy ----------------------------------- //

pub const DEFAULT_MAX_DEPTH: usize = 32;

const LEAF_TYPES: &[&str] = &["text", "email", "password", "number", "select", "textarea"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Deepest section nesting accepted; a top-level section sits at depth 1.
    pub max_depth: usize,
    /// Reject duplicate sibling names and unaddressable names instead of
    /// reporting them as warnings.
    pub strict: bool,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, strict: false }
    }
}

// ------------------------------- Check ------------------------------------ //

/// Walk the node array. Hard violations are returned as `Err`; soft ones
/// (duplicate or unaddressable names outside strict mode) come back as
/// warnings for the caller to log.
pub fn check(nodes: &[Value], limits: &Limits) -> Result<Vec<SchemaShapeError>, SchemaShapeError> {
    // pre-order, so the first violation reported is the first in the document
    struct Frame<'a> {
        parent: FieldPath,
        pending: std::slice::Iter<'a, Value>,
        seen: HashSet<&'a str>,
    }

    let mut warnings = Vec::new();
    let mut stack = vec![Frame { parent: FieldPath::root(), pending: nodes.iter(), seen: HashSet::new() }];

    while let Some(frame) = stack.last_mut() {
        let Some(node) = frame.pending.next() else {
            stack.pop();
            continue;
        };
        let Value::Object(obj) = node else { continue };
        let Some(kind) = obj.get("type").and_then(Value::as_str) else { continue };
        let name = obj.get("name").and_then(Value::as_str);
        let path = frame.parent.child(name.unwrap_or_default());

        let mut children = None;
        if kind == "section" {
            let depth = path.depth();
            if depth > limits.max_depth {
                return Err(SchemaShapeError::TooDeep {
                    path: path.to_string(),
                    limit: limits.max_depth,
                });
            }
            if let Some(Value::Array(fields)) = obj.get("fields") {
                children = Some(fields);
            }
        } else if LEAF_TYPES.contains(&kind) {
            if obj.contains_key("fields") {
                return Err(SchemaShapeError::FieldsOnLeaf {
                    path: path.to_string(),
                    kind: kind.to_string(),
                });
            }
        } else {
            // unknown types are skipped downstream; nothing to check
            continue;
        }

        if let Some(name) = name {
            for issue in name_issues(name, &frame.parent, &mut frame.seen) {
                if limits.strict {
                    return Err(issue);
                }
                warnings.push(issue);
            }
        }

        if let Some(fields) = children {
            stack.push(Frame { parent: path, pending: fields.iter(), seen: HashSet::new() });
        }
    }

    Ok(warnings)
}

fn name_issues<'a>(
    name: &'a str,
    parent: &FieldPath,
    seen: &mut HashSet<&'a str>,
) -> Vec<SchemaShapeError> {
    let mut issues = Vec::new();
    if name.is_empty() || name.contains(SEPARATOR) {
        issues.push(SchemaShapeError::UnaddressableName {
            parent: parent.to_string(),
            name: name.to_string(),
        });
    }
    if !seen.insert(name) {
        issues.push(SchemaShapeError::DuplicateName { path: parent.child(name).to_string() });
    }
    issues
}

/// JSON type name for error messages.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nodes(v: Value) -> Vec<Value> {
        match v {
            Value::Array(xs) => xs,
            other => panic!("expected array, got {other}"),
        }
    }

    fn nested_sections(depth: usize) -> Value {
        let mut node = json!({"type": "text", "name": "leaf", "label": "Leaf"});
        for i in (0..depth).rev() {
            node = json!({"type": "section", "name": format!("s{i}"), "label": "", "fields": [node]});
        }
        json!([node])
    }

    #[test]
    fn well_formed_schema_has_no_issues() {
        let schema = nodes(crate::samples::complex_schema());
        assert_eq!(check(&schema, &Limits::default()), Ok(vec![]));
    }

    #[test]
    fn leaf_with_fields_is_rejected() {
        let schema = nodes(json!([
            {"type": "section", "name": "p", "label": "P", "fields": [
                {"type": "text", "name": "t", "label": "T", "fields": []}
            ]}
        ]));
        assert_eq!(
            check(&schema, &Limits::default()),
            Err(SchemaShapeError::FieldsOnLeaf { path: "p.t".into(), kind: "text".into() })
        );
    }

    #[test]
    fn unknown_types_may_carry_fields() {
        let schema = nodes(json!([{"type": "group", "name": "g", "fields": [1, 2]}]));
        assert_eq!(check(&schema, &Limits::default()), Ok(vec![]));
    }

    #[test]
    fn nesting_limit_is_enforced() {
        let limits = Limits { max_depth: 4, strict: false };
        assert!(check(&nodes(nested_sections(4)), &limits).is_ok());
        assert_eq!(
            check(&nodes(nested_sections(5)), &limits),
            Err(SchemaShapeError::TooDeep { path: "s0.s1.s2.s3.s4".into(), limit: 4 })
        );
    }

    #[test]
    fn duplicates_warn_unless_strict() {
        let schema = nodes(json!([
            {"type": "text", "name": "a", "label": "A"},
            {"type": "email", "name": "a", "label": "A again"}
        ]));
        let warnings = check(&schema, &Limits::default()).unwrap();
        assert_eq!(warnings, vec![SchemaShapeError::DuplicateName { path: "a".into() }]);

        let strict = Limits { strict: true, ..Limits::default() };
        assert_eq!(
            check(&schema, &strict),
            Err(SchemaShapeError::DuplicateName { path: "a".into() })
        );
    }

    #[test]
    fn same_name_in_different_sections_is_fine() {
        let schema = nodes(json!([
            {"type": "section", "name": "home", "label": "", "fields": [
                {"type": "text", "name": "city", "label": ""}]},
            {"type": "section", "name": "work", "label": "", "fields": [
                {"type": "text", "name": "city", "label": ""}]}
        ]));
        assert_eq!(check(&schema, &Limits { strict: true, ..Limits::default() }), Ok(vec![]));
    }

    #[test]
    fn dotted_and_empty_names_are_unaddressable() {
        let schema = nodes(json!([
            {"type": "text", "name": "a.b", "label": ""},
            {"type": "text", "name": "", "label": ""}
        ]));
        let warnings = check(&schema, &Limits::default()).unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(matches!(&warnings[0], SchemaShapeError::UnaddressableName { name, .. } if name == "a.b"));
    }

    #[test]
    fn first_violation_in_document_order_wins() {
        let schema = nodes(json!([
            {"type": "section", "name": "a", "label": "", "fields": [
                {"type": "section", "name": "b", "label": "", "fields": [
                    {"type": "text", "name": "x", "label": "", "fields": []}
                ]}
            ]},
            {"type": "email", "name": "y", "label": "", "fields": []}
        ]));
        assert_eq!(
            check(&schema, &Limits::default()),
            Err(SchemaShapeError::FieldsOnLeaf { path: "a.b.x".into(), kind: "text".into() })
        );
    }

    #[test]
    fn warnings_come_out_in_document_order() {
        let schema = nodes(json!([
            {"type": "section", "name": "s", "label": "", "fields": [
                {"type": "text", "name": "d", "label": ""},
                {"type": "text", "name": "d", "label": ""}
            ]},
            {"type": "text", "name": "t.u", "label": ""}
        ]));
        assert_eq!(
            check(&schema, &Limits::default()).unwrap(),
            vec![
                SchemaShapeError::DuplicateName { path: "s.d".into() },
                SchemaShapeError::UnaddressableName { parent: "".into(), name: "t.u".into() },
            ]
        );
    }

    #[test]
    fn json_type_names() {
        assert_eq!(json_type(&json!({})), "object");
        assert_eq!(json_type(&json!("x")), "string");
        assert_eq!(json_type(&Value::Null), "null");
    }
}

use thiserror::Error;

use crate::path::FieldPath;

/// A change-event path that cannot address a leaf.
///
/// Paths built by the interpreter never trip this, so seeing one means the
/// caller constructed a path by hand (or from an unaddressable schema name).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedPathError {
    #[error("field path is empty")]
    Empty,
    #[error("field path `{path}` has an empty segment at position {index}")]
    EmptySegment { path: String, index: usize },
    #[error("field path has {depth} segments; at most {limit} are supported")]
    TooDeep { depth: usize, limit: usize },
}

/// Everything that can go wrong turning text into a [`crate::schema::Schema`].
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Shape(#[from] SchemaShapeError),
    #[error("schema preprocessing failed: {0}")]
    Filter(String),
}

impl SchemaError {
    /// Parse and shape errors are one class for the end user; the distinction
    /// only matters for logs.
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Shape(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaShapeError {
    #[error("schema must be an array of field objects, found {found}")]
    NotAnArray { found: &'static str },
    #[error("invalid field at {location}: {message}")]
    InvalidNode { location: String, message: String },
    #[error("field `{path}` of type `{kind}` cannot carry `fields`; only sections nest")]
    FieldsOnLeaf { path: String, kind: String },
    #[error("section nesting at `{path}` exceeds the limit of {limit}")]
    TooDeep { path: String, limit: usize },
    #[error("duplicate field name `{path}` among siblings")]
    DuplicateName { path: String },
    #[error("field name `{name}` under `{parent}` cannot be addressed by a dotted path")]
    UnaddressableName { parent: String, name: String },
}

/// Host-side submission failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("no schema loaded")]
    NoSchema,
    #[error("missing required fields: {}", join_paths(.0))]
    MissingRequired(Vec<FieldPath>),
}

fn join_paths(paths: &[FieldPath]) -> String {
    paths
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("input ended while asking for `{path}`")]
    UnexpectedEof { path: FieldPath },
    #[error(transparent)]
    Path(#[from] MalformedPathError),
}

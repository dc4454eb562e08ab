//! Host-side form state: the accepted schema, its render instructions, and
//! the current form data.
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MalformedPathError, SchemaError, SubmitError};
use crate::form_data::FormData;
use crate::interpret::{interpret, leaves, RenderInstruction};
use crate::load::SchemaLoader;
use crate::path::FieldPath;
use crate::schema::Schema;

/// One widget interaction, as reported by the drawing layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub path: String,
    pub value: String,
}

impl ChangeEvent {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self { path: path.into(), value: value.into() }
    }
}

/// `path=value`; the value may itself contain `=`.
impl FromStr for ChangeEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected `path=value`, got `{s}`"))?;
        Ok(Self::new(path, value))
    }
}

#[derive(Debug, Default)]
pub struct FormSession {
    loader: SchemaLoader,
    schema: Option<Schema>,
    instructions: Vec<RenderInstruction>,
    data: FormData,
}

impl FormSession {
    pub fn new(loader: SchemaLoader) -> Self {
        Self { loader, ..Self::default() }
    }

    /// Load schema text. On failure the previously accepted schema,
    /// instructions and data are left as they were.
    pub fn load_str(&mut self, src: &str) -> Result<&[RenderInstruction], SchemaError> {
        match self.loader.load_str(src) {
            Ok(schema) => Ok(self.set_schema(schema)),
            Err(error) => {
                warn!(%error, "rejected schema; keeping the previous one");
                Err(error)
            }
        }
    }

    /// Replace the schema and re-interpret it. Form data is kept.
    pub fn set_schema(&mut self, schema: Schema) -> &[RenderInstruction] {
        self.instructions = interpret(&schema);
        self.schema = Some(schema);
        info!(fields = leaves(&self.instructions).count(), "form ready");
        &self.instructions
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn instructions(&self) -> &[RenderInstruction] {
        &self.instructions
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn change(&mut self, path: &str, value: impl Into<String>) -> Result<&FormData, MalformedPathError> {
        self.data = self.data.merge(path, value)?;
        Ok(&self.data)
    }

    pub fn change_path(
        &mut self,
        path: &FieldPath,
        value: impl Into<String>,
    ) -> Result<&FormData, MalformedPathError> {
        self.data = self.data.merge_path(path, value)?;
        Ok(&self.data)
    }

    pub fn apply(&mut self, event: &ChangeEvent) -> Result<&FormData, MalformedPathError> {
        self.change(&event.path, event.value.as_str())
    }

    pub fn replace_data(&mut self, data: FormData) {
        self.data = data;
    }

    pub fn reset(&mut self) {
        self.data = FormData::new();
    }

    /// Required leaves without a non-empty value, in document order.
    pub fn missing_required(&self) -> Vec<FieldPath> {
        leaves(&self.instructions)
            .filter(|field| field.required)
            .filter(|field| self.data.get(&field.path).is_none_or(str::is_empty))
            .map(|field| field.path.clone())
            .collect()
    }

    pub fn submit(&self) -> Result<FormData, SubmitError> {
        if self.schema.is_none() {
            return Err(SubmitError::NoSchema);
        }
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(SubmitError::MissingRequired(missing));
        }
        info!(data = %self.data.to_json(), "form submitted");
        Ok(self.data.clone())
    }
}

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::SchemaShapeError;

/// Deserialize with JSON-path context in error messages.
pub fn from_value_with_path<T: DeserializeOwned>(value: Value) -> Result<T, SchemaShapeError> {
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(v) => Ok(v),
        Err(err) => {
            let location = err.path().to_string();
            Err(SchemaShapeError::InvalidNode {
                location,
                message: err.into_inner().to_string(),
            })
        }
    }
}

//! Compiled chart schema document.
//!
//! The document (the Vega-Lite JSON Schema in production) is compiled once
//! at startup and shared read-only by every job through an `Arc`.

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid schema document: {0}")]
    Invalid(String),
}

pub struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// Compile `document` into a reusable validator.
    pub fn new(document: &Value) -> Result<Self, SchemaError> {
        let validator =
            jsonschema::validator_for(document).map_err(|e| SchemaError::Invalid(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Validate `instance`, returning the first violation as text.
    pub fn validate(&self, instance: &Value) -> Result<(), String> {
        self.validator.validate(instance).map_err(|e| e.to_string())
    }
}

//! Schema validation of parsed model output against a field contract.

use serde_json::{Map, Value};
use thiserror::Error;

use super::contract::{FieldContract, FieldKind, FieldSpec};
use super::record::{FieldValue, Record};

/// Errors that can occur during contract validation.
///
/// These never reach a client: any validation failure sends the raw text
/// through field recovery instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaValidationError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid type for field {field}: expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Array too short for field {field}: minimum {min}, got {actual}")]
    ArrayTooShort {
        field: String,
        min: usize,
        actual: usize,
    },
}

impl SchemaValidationError {
    /// Name (or element path) of the offending field.
    pub fn field(&self) -> &str {
        match self {
            SchemaValidationError::MissingRequired { field }
            | SchemaValidationError::InvalidType { field, .. }
            | SchemaValidationError::ArrayTooShort { field, .. } => field,
        }
    }
}

/// Validates a parsed candidate against `contract`.
///
/// Present fields pass through unchanged. Missing fields take the contract
/// default, or the kind's empty value when optional; a missing required field
/// without a default is an error.
pub fn validate(candidate: &Value, contract: &FieldContract) -> Result<Record, SchemaValidationError> {
    let obj = require_object(candidate)?;
    let mut record = Record::new(contract);

    for spec in &contract.fields {
        let value = match obj.get(spec.name) {
            Some(value) => {
                check_kind(spec, value)?;
                FieldValue::recovered(value.clone())
            }
            None => missing_value(spec)?,
        };
        record.push(spec.name, value);
    }

    Ok(record)
}

fn require_object(value: &Value) -> Result<&Map<String, Value>, SchemaValidationError> {
    value
        .as_object()
        .ok_or_else(|| SchemaValidationError::InvalidType {
            field: "root".to_string(),
            expected: "object".to_string(),
            actual: json_type_name(value).to_string(),
        })
}

fn missing_value(spec: &FieldSpec) -> Result<FieldValue, SchemaValidationError> {
    match &spec.default {
        Some(default) => Ok(FieldValue::defaulted(default.clone())),
        None if spec.required => Err(SchemaValidationError::MissingRequired {
            field: spec.name.to_string(),
        }),
        None => Ok(FieldValue::defaulted(spec.kind.empty_value())),
    }
}

fn check_kind(spec: &FieldSpec, value: &Value) -> Result<(), SchemaValidationError> {
    let invalid = |field: String, expected: &str, actual: &Value| SchemaValidationError::InvalidType {
        field,
        expected: expected.to_string(),
        actual: json_type_name(actual).to_string(),
    };

    match spec.kind {
        FieldKind::String => {
            if !value.is_string() {
                return Err(invalid(spec.name.to_string(), spec.kind.as_str(), value));
            }
        }
        FieldKind::StringSequence | FieldKind::ArbitrarySequence => {
            let items = value
                .as_array()
                .ok_or_else(|| invalid(spec.name.to_string(), spec.kind.as_str(), value))?;

            if spec.kind == FieldKind::StringSequence {
                if let Some((i, item)) = items.iter().enumerate().find(|(_, v)| !v.is_string()) {
                    return Err(invalid(format!("{}[{}]", spec.name, i), "string", item));
                }
            }

            if items.len() < spec.min_items {
                return Err(SchemaValidationError::ArrayTooShort {
                    field: spec.name.to_string(),
                    min: spec.min_items,
                    actual: items.len(),
                });
            }
        }
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

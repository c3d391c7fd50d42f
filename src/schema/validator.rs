//! Structural validator for descriptor-constrained documents.
//!
//! Walks a document and its descriptor in lock-step:
//! - every key in the document must be declared in exactly one of the four
//!   descriptor categories at its level (closed world)
//! - absence of a declared key is allowed; only extra keys are fatal
//! - shape checks are exact, with no coercion (0/1/"true" is not a boolean)
//!
//! Validation is deterministic and fail-fast: the first violation is
//! reported with its full key chain and the walk stops. The validator never
//! mutates the document.

use serde_json::{Map, Value};

use super::descriptor::{Descriptor, KeyKind};
use super::errors::{SchemaError, SchemaResult};

/// Validates a document against a descriptor.
///
/// The document itself must be an object; anything else is a type error at
/// the root.
///
/// # Errors
///
/// Returns [`SchemaError`] naming the offending key path on the first
/// undeclared key, shape mismatch, or undescribed nested object.
pub fn validate(document: &Value, descriptor: &Descriptor) -> SchemaResult<()> {
    let obj = document
        .as_object()
        .ok_or_else(|| SchemaError::type_mismatch("$root", "object", json_type_name(document)))?;
    validate_object(obj, descriptor, "")
}

/// Validates one object level against a descriptor, recursing into declared
/// lists of objects and nested objects.
pub fn validate_object(
    obj: &Map<String, Value>,
    descriptor: &Descriptor,
    prefix: &str,
) -> SchemaResult<()> {
    for (key, value) in obj {
        let path = make_path(prefix, key);

        match descriptor.category_of(key) {
            None => return Err(SchemaError::undeclared_key(path)),

            Some(KeyKind::Bool) => {
                if !value.is_boolean() {
                    return Err(SchemaError::type_mismatch(
                        path,
                        "boolean",
                        json_type_name(value),
                    ));
                }
            }

            Some(KeyKind::Field) => {
                // Scalars only; a sequence or nested structure in a field
                // slot is a shape error.
                if value.is_array() || value.is_object() {
                    return Err(SchemaError::type_mismatch(
                        path,
                        "scalar",
                        json_type_name(value),
                    ));
                }
            }

            Some(KeyKind::List) => {
                let items = value.as_array().ok_or_else(|| {
                    SchemaError::type_mismatch(path.clone(), "array", json_type_name(value))
                })?;

                match descriptor.list_entry(key) {
                    Some(entry) => {
                        for (index, element) in items.iter().enumerate() {
                            let element_path = format!("{}[{}]", path, index);
                            let element_obj = element.as_object().ok_or_else(|| {
                                SchemaError::type_mismatch(
                                    element_path.clone(),
                                    "object",
                                    json_type_name(element),
                                )
                            })?;
                            validate_object(element_obj, entry, &element_path)?;
                        }
                    }
                    None => {
                        for (index, element) in items.iter().enumerate() {
                            if element.is_array() || element.is_object() {
                                return Err(SchemaError::type_mismatch(
                                    format!("{}[{}]", path, index),
                                    "scalar",
                                    json_type_name(element),
                                ));
                            }
                        }
                    }
                }
            }

            Some(KeyKind::Object) => {
                let nested = value.as_object().ok_or_else(|| {
                    SchemaError::type_mismatch(path.clone(), "object", json_type_name(value))
                })?;
                let entry = descriptor
                    .object_entry(key)
                    .ok_or_else(|| SchemaError::missing_entry(path.clone()))?;
                validate_object(nested, entry, &path)?;
            }
        }
    }

    Ok(())
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a key path from prefix and key.
fn make_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

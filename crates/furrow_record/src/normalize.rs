//! Input normalization for collection, attachment, and notes fields.
//!
//! Producing layers hand collection fields over either structured or
//! as JSON-serialized strings (durable caches historically stored
//! strings), and the server reports attachments in several shapes.
//! Everything funnels through here on the way into a canonical record.

use serde_json::Value;

use crate::error::{RecordError, RecordResult};
use crate::record::Movement;

/// Coerces a collection field into its canonical list shape.
///
/// Accepts a JSON array or a string that parses to one.
pub(crate) fn object_list(field: &'static str, value: Value) -> RecordResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(other) => Err(RecordError::malformed(
                field,
                format!("serialized form is not a list, got {}", kind_of(&other)),
            )),
            Err(err) => Err(RecordError::malformed(
                field,
                format!("unparseable serialized form: {}", err),
            )),
        },
        other => Err(RecordError::malformed(
            field,
            format!("expected a list or serialized list, got {}", kind_of(&other)),
        )),
    }
}

/// Coerces a movement field into its structured shape.
pub(crate) fn movement(field: &'static str, value: Value) -> RecordResult<Movement> {
    let structured = match value {
        Value::Object(map) => Value::Object(map),
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Value::Object(map),
            Ok(other) => {
                return Err(RecordError::malformed(
                    field,
                    format!("serialized form is not a movement, got {}", kind_of(&other)),
                ))
            }
            Err(err) => {
                return Err(RecordError::malformed(
                    field,
                    format!("unparseable serialized form: {}", err),
                ))
            }
        },
        other => {
            return Err(RecordError::malformed(
                field,
                format!("expected a movement or serialized movement, got {}", kind_of(&other)),
            ))
        }
    };
    serde_json::from_value(structured)
        .map_err(|err| RecordError::malformed(field, format!("not a movement payload: {}", err)))
}

/// Normalizes an attachment field into a list of reference strings.
///
/// Accepted shapes:
/// - a list of reference strings,
/// - a list of single-key objects whose value is a bare reference or
///   an object carrying an `id` (stringified),
/// - a single string, where `""` means no attachments.
pub(crate) fn image_list(field: &'static str, value: Value) -> RecordResult<Vec<String>> {
    match value {
        Value::Array(items) => {
            let mut refs = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(image) => refs.push(image),
                    Value::Object(map) => {
                        for (_, inner) in map {
                            refs.push(image_ref(field, inner)?);
                        }
                    }
                    other => {
                        return Err(RecordError::malformed(
                            field,
                            format!("attachment entry is {}", kind_of(&other)),
                        ))
                    }
                }
            }
            Ok(refs)
        }
        Value::String(image) if image.is_empty() => Ok(Vec::new()),
        Value::String(image) => Ok(vec![image]),
        other => Err(RecordError::malformed(
            field,
            format!("expected a list or string, got {}", kind_of(&other)),
        )),
    }
}

fn image_ref(field: &'static str, value: Value) -> RecordResult<String> {
    match value {
        Value::String(image) => Ok(image),
        Value::Object(map) => match map.get("id") {
            Some(Value::String(id)) => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            Some(other) => Err(RecordError::malformed(
                field,
                format!("attachment id is {}", kind_of(other)),
            )),
            None => Err(RecordError::malformed(field, "attachment object has no id")),
        },
        other => Err(RecordError::malformed(
            field,
            format!("attachment reference is {}", kind_of(&other)),
        )),
    }
}

/// Strips the markup wrapper the server puts around note text.
///
/// Server notes arrive as paragraph markup with a trailing newline;
/// exactly 3 leading and 5 trailing characters go. Absent, null, or
/// empty values read as no notes, as does anything too short to hold
/// the wrapper.
pub(crate) fn server_notes(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let len = value.chars().count();
    if len <= 8 {
        return String::new();
    }
    value.chars().skip(3).take(len - 8).collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

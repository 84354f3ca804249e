//! Request validation for persona routes.
//!
//! Checks run in a fixed order and the first failure wins: missing (or
//! falsy) fields, then non-string fields, then whitespace-only fields, then
//! the persona's length limit.

use serde_json::Value;

use super::error::ApiError;
use crate::persona::Persona;

/// A validated request: values are kept exactly as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inquiry {
    pub name: String,
    pub text: String,
}

/// Validate a decoded JSON body for `persona`.
pub fn validate(persona: Persona, body: &Value) -> Result<Inquiry, ApiError> {
    let Value::Object(fields) = body else {
        return Err(ApiError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    };

    let name = fields.get("name");
    let text = fields.get(persona.text_field());

    let (Some(name), Some(text)) = (name.filter(|v| is_truthy(v)), text.filter(|v| is_truthy(v)))
    else {
        return Err(ApiError::BadRequest(persona.missing_fields_error()));
    };

    let (Value::String(name), Value::String(text)) = (name, text) else {
        return Err(ApiError::BadRequest(persona.not_strings_error()));
    };

    if is_blank(name) || is_blank(text) {
        return Err(ApiError::BadRequest(persona.empty_fields_error()));
    }

    if let Some(limit) = persona.max_text_chars() {
        if text.chars().count() > limit {
            return Err(ApiError::BadRequest(persona.too_long_error(limit)));
        }
    }

    Ok(Inquiry {
        name: name.clone(),
        text: text.clone(),
    })
}

/// Whitespace-only, counting the ASCII separators U+001C..=U+001F as whitespace.
fn is_blank(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
}

/// `null`, `false`, zero, and empty strings/arrays/objects count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

use serde_json::Value;

use crate::domain::errors::PaymentsError;

// Falsy JSON: null, false, "", 0 and empty containers.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(true) => false,
    }
}

// Required text parameter. Absent and empty values both count as missing.
pub fn require_text(value: Option<String>, field: &'static str) -> Result<String, PaymentsError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(PaymentsError::MissingParameter(field)),
    }
}

// Required provider identifier. Falsy JSON counts as missing; any other
// scalar is taken as its text, so `123` and `"123"` name the same object.
pub fn require_id(value: Option<Value>, field: &'static str) -> Result<String, PaymentsError> {
    match value {
        Some(value) if !is_blank(&value) => Ok(match value {
            Value::String(text) => text,
            other => other.to_string(),
        }),
        _ => Err(PaymentsError::MissingParameter(field)),
    }
}

// Required unit count. Falsy JSON counts as missing; integers, floats
// (truncated) and integer strings are accepted.
pub fn require_count(value: Option<&Value>, field: &'static str) -> Result<i64, PaymentsError> {
    let value = match value {
        Some(value) if !is_blank(value) => value,
        _ => return Err(PaymentsError::MissingParameter(field)),
    };

    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.is_finite() && float.abs() < i64::MAX as f64)
                    .map(|float| float.trunc() as i64)
            })
            .ok_or(PaymentsError::InvalidParameter(field)),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| PaymentsError::InvalidParameter(field)),
        _ => Err(PaymentsError::InvalidParameter(field)),
    }
}

// Optional scalar forwarded to the provider as text; null means "not sent".
pub fn optional_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

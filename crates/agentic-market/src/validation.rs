//! Loose input checks shared by the handlers.
//!
//! Request fields arrive as raw JSON so that a missing or wrongly-typed
//! field reaches the handler and yields its own error code.

use serde_json::Value;

use crate::constants::HTTPS_PREFIX;
use crate::error::ErrorCode;

/// A string starting with the literal `https://`.
pub fn is_https_url(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.starts_with(HTTPS_PREFIX))
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Read a boolean flag from an options object; non-object options yield `false`.
pub fn option_flag(options: &Value, key: &str) -> bool {
    options
        .as_object()
        .and_then(|o| o.get(key))
        .is_some_and(is_truthy)
}

/// Parse a billing unit count: a positive JSON integer.
///
/// Floats (even `2.0`), booleans, strings and `null` are rejected. A count
/// that parses here can still be refused with `INVALID_UNITS` by the biller
/// when pricing it overflows `u64`.
pub fn parse_units(value: &Value) -> Result<u64, ErrorCode> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(u) if u > 0 => Ok(u),
            _ => Err(ErrorCode::InvalidUnits),
        },
        _ => Err(ErrorCode::InvalidUnits),
    }
}

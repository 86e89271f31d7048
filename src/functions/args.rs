//! Typed access to templated arguments for the builtins.

use serde_json::{Map, Value};

use crate::context::json_type;
use crate::errors::{Result, ValidationError};

fn mismatch(name: &str, index: usize, expected: &str, got: Option<&Value>) -> ValidationError {
    ValidationError::Argument {
        name: name.to_string(),
        message: format!(
            "argument {index} must be {expected}, got {}",
            got.map(json_type).unwrap_or("nothing")
        ),
    }
}

pub fn value<'a>(name: &str, args: &'a [Value], index: usize) -> Result<&'a Value> {
    args.get(index).ok_or_else(|| mismatch(name, index, "present", None))
}

pub fn text<'a>(name: &str, args: &'a [Value], index: usize) -> Result<&'a str> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s),
        other => Err(mismatch(name, index, "a string", other)),
    }
}

/// Accepts JSON integers and numeric strings, since submitted form data
/// usually arrives as text.
pub fn int(name: &str, args: &[Value], index: usize) -> Result<i64> {
    let arg = args.get(index);
    let parsed = match arg {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(name, index, "an integer", arg))
}

pub fn array<'a>(name: &str, args: &'a [Value], index: usize) -> Result<&'a Vec<Value>> {
    match args.get(index) {
        Some(Value::Array(a)) => Ok(a),
        other => Err(mismatch(name, index, "an array", other)),
    }
}

pub fn object<'a>(name: &str, args: &'a [Value], index: usize) -> Result<&'a Map<String, Value>> {
    match args.get(index) {
        Some(Value::Object(o)) => Ok(o),
        other => Err(mismatch(name, index, "an object", other)),
    }
}

/// Optional trailing flag; absent means `false`.
pub fn flag(name: &str, args: &[Value], index: usize) -> Result<bool> {
    match args.get(index) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        other => Err(mismatch(name, index, "a boolean", other)),
    }
}

/// Renders a scalar key argument (string or number) as an object key.
pub fn key(name: &str, args: &[Value], index: usize) -> Result<String> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        other => Err(mismatch(name, index, "a string or number", other)),
    }
}

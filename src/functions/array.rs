//! `array.*` predicates over JSON arrays and objects.

use itertools::Itertools;
use serde_json::Value;

use super::{args, pure, Registry};
use crate::context::json_type;
use crate::errors::{Result, ValidationError};

pub(crate) fn register(registry: &mut Registry) {
    pure(registry, "array.contains_keys", 2..=2, contains_keys);
    pure(registry, "array.does_not_contain_key", 2..=2, does_not_contain_key);
    pure(registry, "array.limited_keys", 2..=2, limited_keys);
    pure(registry, "array.max_number_of_values", 2..=2, max_number_of_values);
    pure(registry, "array.not_empty", 1..=1, not_empty);
    pure(registry, "array.unique_values", 1..=1, unique_values);
}

fn key_list(name: &str, a: &[Value], index: usize) -> Result<Vec<String>> {
    args::array(name, a, index)?
        .iter()
        .enumerate()
        .map(|(i, v)| match v {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(ValidationError::Argument {
                name: name.to_string(),
                message: format!("key {i} must be a string or number, got {}", json_type(other)),
            }),
        })
        .collect()
}

/// Every listed key is present.
pub fn contains_keys(a: &[Value]) -> Result<bool> {
    let obj = args::object("array.contains_keys", a, 0)?;
    let keys = key_list("array.contains_keys", a, 1)?;
    Ok(keys.iter().all(|k| obj.contains_key(k)))
}

/// Absent or null both count as "not contained".
pub fn does_not_contain_key(a: &[Value]) -> Result<bool> {
    let obj = args::object("array.does_not_contain_key", a, 0)?;
    let key = args::key("array.does_not_contain_key", a, 1)?;
    Ok(obj.get(&key).map_or(true, Value::is_null))
}

/// No key outside the allowed list.
pub fn limited_keys(a: &[Value]) -> Result<bool> {
    let obj = args::object("array.limited_keys", a, 0)?;
    let allowed = key_list("array.limited_keys", a, 1)?;
    Ok(obj.keys().all(|k| allowed.contains(k)))
}

pub fn max_number_of_values(a: &[Value]) -> Result<bool> {
    let max = args::int("array.max_number_of_values", a, 1)?;
    Ok(len("array.max_number_of_values", a)? as i64 <= max)
}

pub fn not_empty(a: &[Value]) -> Result<bool> {
    Ok(len("array.not_empty", a)? > 0)
}

pub fn unique_values(a: &[Value]) -> Result<bool> {
    let items = args::array("array.unique_values", a, 0)?;
    Ok(items.iter().map(Value::to_string).all_unique())
}

fn len(name: &str, a: &[Value]) -> Result<usize> {
    match a.first() {
        Some(Value::Array(items)) => Ok(items.len()),
        Some(Value::Object(map)) => Ok(map.len()),
        _ => args::array(name, a, 0).map(Vec::len),
    }
}

use serde_json::{Map, Value};

use crate::errors::{Result, ValidationError};

/// Key holding the rule currently being evaluated.
pub const THIS_KEY: &str = "__this__";
/// Key holding the nearest ancestor of the current rule (or null).
pub const PARENT_KEY: &str = "__parent__";
/// Key holding the rule tree being walked.
pub const SCHEMA_KEY: &str = "__schema__";

/// The mapping placeholders are resolved against.
///
/// Shared by every node of one pass: predicates and interstitials may write
/// to it and later siblings observe those writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataContext {
    entries: Map<String, Value>,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from a JSON object; any other JSON shape is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(ValidationError::InvalidData(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }

    /// Walks `a.b.c` through nested objects (and array indices).
    pub fn lookup_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.entries.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(arr) => arr.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl From<Map<String, Value>> for DataContext {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

/// Mutable state handed to predicates and interstitials: the data context
/// plus the stored-data side channel the caller reads back after the pass.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub data: DataContext,
    pub stored: Map<String, Value>,
}

impl Scope {
    pub fn new(data: DataContext) -> Self {
        Self { data, stored: Map::new() }
    }

    pub fn store(&mut self, key: impl Into<String>, value: Value) {
        self.stored.insert(key.into(), value);
    }
}

pub(crate) fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx() -> DataContext {
        DataContext::from_value(json!({
            "user": {"name": "oliver", "tags": ["a", "b"]},
            "flat": 1
        }))
        .unwrap()
    }

    #[test]
    fn dotted_lookup_walks_objects_and_arrays() {
        let c = ctx();
        assert_eq!(c.lookup_path("user.name"), Some(&json!("oliver")));
        assert_eq!(c.lookup_path("user.tags.1"), Some(&json!("b")));
        assert_eq!(c.lookup_path("flat"), Some(&json!(1)));
    }

    #[test]
    fn dotted_lookup_misses() {
        let c = ctx();
        assert_eq!(c.lookup_path("user.email"), None);
        assert_eq!(c.lookup_path("flat.deeper"), None);
        assert_eq!(c.lookup_path("user.tags.9"), None);
        assert_eq!(c.lookup_path("nope"), None);
    }

    #[test]
    fn rejects_non_object_data() {
        let err = DataContext::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidData(_)));
    }
}

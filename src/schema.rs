use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde_json::Value;

use crate::errors::{Result, ValidationError};
use crate::filter;
use crate::rule::Rule;

/// A rule tree as authored: an ordered list of top-level rule nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    rules: Vec<Rule>,
}

impl Schema {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = raw.len(), "loading schema");
        raw.parse()
    }

    /// The root must be a JSON array of rule objects.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_array() {
            return Err(ValidationError::Schema(
                "schema root must be an array of rules".into(),
            ));
        }
        check_rule_list(&value, "<root>", "rules")?;
        Ok(Self { rules: serde_json::from_value(value)? })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    /// The subset of this schema tagged for `tag` (see [`filter::limit`]).
    pub fn limited_to(&self, tag: &str) -> Schema {
        Schema { rules: filter::limit(&self.rules, tag) }
    }

    pub fn client_rules(&self) -> Vec<Rule> {
        filter::limit(&self.rules, filter::CLIENT)
    }

    pub fn server_rules(&self) -> Vec<Rule> {
        filter::limit(&self.rules, filter::SERVER)
    }
}

/// Every entry of a rule list must be a JSON object. Catches arrays nested
/// one level too deep before serde turns them into a type error.
fn check_rule_list(list: &Value, owner: &str, field: &'static str) -> Result<()> {
    let Value::Array(entries) = list else {
        return Ok(());
    };
    for (index, entry) in entries.iter().enumerate() {
        let Value::Object(node) = entry else {
            return Err(ValidationError::Structure { owner: owner.to_string(), field, index });
        };
        let label = ["interstitial", "validator"]
            .iter()
            .find_map(|key| node.get(*key).and_then(Value::as_str))
            .unwrap_or("<anonymous>");
        for child_field in ["rules", "alternatives"] {
            if let Some(children) = node.get(child_field) {
                check_rule_list(children, label, child_field)?;
            }
        }
    }
    Ok(())
}

impl FromStr for Schema {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(s)?)
    }
}

impl From<Vec<Rule>> for Schema {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

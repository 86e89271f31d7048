use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::errors::Result;
use crate::rule::Rule;

/// Key under which a failed rule's parent chain is rendered.
pub const PARENT_LINK: &str = "_parent";

/// A rule that failed, plus (optionally) the ancestors it was reached through.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRule {
    pub rule: Rule,
    /// Root first, nearest parent last. Empty for top-level rules and for
    /// exports with parents stripped.
    pub ancestors: Vec<Rule>,
}

impl FailedRule {
    pub fn parent(&self) -> Option<&Rule> {
        self.ancestors.last()
    }

    /// Renders the rule as JSON with a nested `_parent` chain, one level per
    /// ancestor. No `_parent` key at all when there are no ancestors.
    pub fn to_value(&self) -> Result<Value> {
        let mut parent: Option<Value> = None;
        for ancestor in self.ancestors.iter().chain(std::iter::once(&self.rule)) {
            let mut value = ancestor.to_value()?;
            if let (Value::Object(map), Some(link)) = (&mut value, parent.take()) {
                map.insert(PARENT_LINK.to_string(), link);
            }
            parent = Some(value);
        }
        Ok(parent.unwrap_or(Value::Null))
    }
}

impl Serialize for FailedRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

/// Append-only, evaluation-ordered list of failures. Tree shape is not kept;
/// the same rule may appear more than once if several paths reach it.
#[derive(Debug, Clone, Default)]
pub struct FailureCollector {
    failures: Vec<FailedRule>,
}

impl FailureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, rule: &Rule, ancestors: &[&Rule]) {
        self.failures.push(FailedRule {
            rule: rule.clone(),
            ancestors: ancestors.iter().map(|r| (*r).clone()).collect(),
        });
    }

    pub fn clear(&mut self) {
        self.failures.clear();
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FailedRule> {
        self.failures.iter()
    }

    pub fn export(&self, include_parents: bool) -> Vec<FailedRule> {
        self.failures
            .iter()
            .map(|f| FailedRule {
                rule: f.rule.clone(),
                ancestors: if include_parents { f.ancestors.clone() } else { Vec::new() },
            })
            .collect()
    }
}

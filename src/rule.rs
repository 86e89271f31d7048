use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, ValidationError};

/// One node of the validation tree, as authored in the schema.
///
/// Fields the engine does not interpret (an `error` message, a field label,
/// ...) are kept in `extra` so they survive into the failed-rule export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interstitial: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Rule>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub funnel: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub blocking: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// What the walker should invoke for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    Interstitial(&'a str),
    Validator(&'a str),
}

impl Rule {
    pub fn validator(id: impl Into<String>) -> Self {
        Self { validator: Some(id.into()), ..Self::default() }
    }

    pub fn interstitial(id: impl Into<String>) -> Self {
        Self { interstitial: Some(id.into()), ..Self::default() }
    }

    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_alternatives(mut self, alternatives: Vec<Rule>) -> Self {
        self.alternatives = alternatives;
        self
    }

    pub fn funnel(mut self) -> Self {
        self.funnel = true;
        self
    }

    pub fn blocking(mut self) -> Self {
        self.blocking = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn with_range<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.range = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Interstitial wins when a node (wrongly) declares both.
    pub fn kind(&self) -> Option<NodeKind<'_>> {
        match (&self.interstitial, &self.validator) {
            (Some(id), _) => Some(NodeKind::Interstitial(id)),
            (None, Some(id)) => Some(NodeKind::Validator(id)),
            (None, None) => None,
        }
    }

    /// Identifier used in logs and error messages.
    pub fn label(&self) -> &str {
        match self.kind() {
            Some(NodeKind::Interstitial(id)) | Some(NodeKind::Validator(id)) => id,
            None => "<anonymous>",
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Every enabled entry of a child list must itself be a rule node with
/// something to invoke. Disabled entries are never looked at.
pub fn ensure_homogeneous(owner: &Rule, field: &'static str, children: &[Rule]) -> Result<()> {
    match children.iter().position(|child| !child.disabled && child.kind().is_none()) {
        Some(index) => Err(ValidationError::Structure {
            owner: owner.label().to_string(),
            field,
            index,
        }),
        None => Ok(()),
    }
}

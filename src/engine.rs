use serde_json::{Map, Value};
use tracing::debug;

use crate::collector::{FailedRule, FailureCollector};
use crate::context::{DataContext, Scope, PARENT_KEY, SCHEMA_KEY, THIS_KEY};
use crate::errors::Result;
use crate::filter;
use crate::functions::{Registry, Resolver};
use crate::rule::Rule;
use crate::schema::Schema;
use crate::walker::{Flow, Walker};

/// Knobs for a [`SchemaValidator`].
#[derive(Debug, Default, Clone)]
pub struct EngineOptions {
    /// Abort the pass when a failing rule has a blocking ancestor.
    pub inherit_blocking: bool,
    /// Keep only rules whose `range` admits this tag.
    pub range: Option<String>,
}

impl EngineOptions {
    pub fn inherit_blocking(mut self, yes: bool) -> Self {
        self.inherit_blocking = yes;
        self
    }

    pub fn range(mut self, tag: impl Into<String>) -> Self {
        self.range = Some(tag.into());
        self
    }
}

/// Validates one data context against one rule tree.
pub struct SchemaValidator<R: Resolver = Registry> {
    rules: Vec<Rule>,
    resolver: R,
    options: EngineOptions,
    scope: Scope,
    failures: FailureCollector,
}

impl SchemaValidator<Registry> {
    /// Uses the builtin registry and default options.
    pub fn new(schema: Schema, data: DataContext) -> Self {
        Self::with_resolver(schema, data, Registry::with_builtins(), EngineOptions::default())
    }
}

impl<R: Resolver> SchemaValidator<R> {
    pub fn with_resolver(schema: Schema, data: DataContext, resolver: R, options: EngineOptions) -> Self {
        let rules = match &options.range {
            Some(tag) => filter::limit(schema.rules(), tag),
            None => schema.into_rules(),
        };
        Self {
            rules,
            resolver,
            options,
            scope: Scope::new(data),
            failures: FailureCollector::new(),
        }
    }

    /// Rules the walker will see, after any range filtering.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn add_data(&mut self, key: impl Into<String>, value: Value) {
        self.scope.data.insert(key, value);
    }

    pub fn data(&self) -> &DataContext {
        &self.scope.data
    }

    pub fn store(&mut self, key: impl Into<String>, value: Value) {
        self.scope.store(key, value);
    }

    pub fn stored_data(&self) -> &Map<String, Value> {
        &self.scope.stored
    }

    /// Walks the whole tree once. `Ok(true)` iff no rule failed.
    ///
    /// A blocking failure ends the walk early but is still just `Ok(false)`;
    /// only defects in the schema, the data or a callable surface as `Err`.
    pub fn valid(&mut self) -> Result<bool> {
        self.failures.clear();
        self.scope
            .data
            .insert(SCHEMA_KEY, serde_json::to_value(&self.rules)?);

        let walker = Walker::new(&self.resolver).inherit_blocking(self.options.inherit_blocking);
        let outcome = walker.evaluate(&self.rules, &mut Vec::new(), &mut self.scope, &mut self.failures);

        self.scope.data.remove(THIS_KEY);
        self.scope.data.remove(PARENT_KEY);

        let flow = outcome?;
        debug!(
            failures = self.failures.len(),
            aborted = flow == Flow::StopAll,
            "validation pass finished"
        );
        Ok(self.failures.is_empty())
    }

    /// Failures from the last [`valid`](Self::valid) call, in evaluation order.
    pub fn failed_rules(&self, include_parents: bool) -> Vec<FailedRule> {
        self.failures.export(include_parents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn data(v: Value) -> DataContext {
        DataContext::from_value(v).unwrap()
    }

    #[test]
    fn blocking_name_rule_stops_comment_rule() {
        let schema: Schema = r#"[
            {"validator": "string.not_empty", "params": ["{name}"], "blocking": true},
            {"validator": "string.not_empty", "params": ["{comment}"]}
        ]"#
        .parse()
        .unwrap();
        let mut validator = SchemaValidator::new(schema, data(json!({"name": "", "comment": "hi"})));
        assert!(!validator.valid().unwrap());
        let failed = validator.failed_rules(true);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].rule.params, vec![json!("{name}")]);
    }

    #[test]
    fn transient_keys_do_not_outlive_the_pass() {
        let schema = Schema::new(vec![Rule::validator("string.not_empty").with_params(vec![json!("x")])]);
        let mut validator = SchemaValidator::new(schema, DataContext::new());
        assert!(validator.valid().unwrap());
        assert!(validator.data().get(THIS_KEY).is_none());
        assert!(validator.data().get(PARENT_KEY).is_none());
        assert_eq!(
            validator.data().get(SCHEMA_KEY),
            Some(&json!([{"validator": "string.not_empty", "params": ["x"]}]))
        );
    }

    #[test]
    fn repeated_passes_do_not_accumulate() {
        let schema = Schema::new(vec![Rule::validator("string.not_empty").with_params(vec![json!("{v}")])]);
        let mut validator = SchemaValidator::new(schema, data(json!({"v": ""})));
        assert!(!validator.valid().unwrap());
        assert!(!validator.valid().unwrap());
        assert_eq!(validator.failed_rules(false).len(), 1);

        validator.add_data("v", json!("filled"));
        assert!(validator.valid().unwrap());
        assert!(validator.failed_rules(false).is_empty());
    }

    #[test]
    fn range_option_filters_before_walking() {
        let schema = Schema::new(vec![
            Rule::validator("string.not_empty").with_params(vec![json!("")]).with_range(["client"]),
            Rule::validator("string.not_empty").with_params(vec![json!("ok")]),
        ]);
        let mut validator = SchemaValidator::with_resolver(
            schema,
            DataContext::new(),
            Registry::with_builtins(),
            EngineOptions::default().range("server"),
        );
        assert_eq!(validator.rules().len(), 1);
        assert!(validator.valid().unwrap());
    }

    #[test]
    fn store_is_separate_from_data() {
        let schema = Schema::new(vec![
            Rule::interstitial("data.store").with_params(vec![json!("greeting"), json!("hello {name}")]),
        ]);
        let mut validator = SchemaValidator::new(schema, data(json!({"name": "oliver"})));
        validator.store("preset", json!(1));
        assert!(validator.valid().unwrap());
        assert_eq!(validator.stored_data().get("preset"), Some(&json!(1)));
        assert_eq!(validator.stored_data().get("greeting"), Some(&json!("hello oliver")));
        assert!(validator.data().get("greeting").is_none());
    }
}

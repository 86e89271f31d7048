use serde_json::Value;
use tracing::{debug, trace};

use crate::collector::FailureCollector;
use crate::context::{Scope, PARENT_KEY, THIS_KEY};
use crate::errors::{Result, ValidationError};
use crate::functions::{check_arity, Resolver};
use crate::rule::{ensure_homogeneous, NodeKind, Rule};
use crate::template;

/// How a sibling list finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Every node was visited (or skipped); the caller moves on.
    Continue,
    /// A blocking rule failed. Every enclosing list must stop immediately.
    StopAll,
}

/// Depth-first evaluator for a rule tree.
///
/// Ancestors are threaded through the recursion as an explicit stack, never
/// written onto the nodes themselves.
pub struct Walker<'r> {
    resolver: &'r dyn Resolver,
    inherit_blocking: bool,
}

impl<'r> Walker<'r> {
    pub fn new(resolver: &'r dyn Resolver) -> Self {
        Self { resolver, inherit_blocking: false }
    }

    /// With this on, a failing rule also aborts the pass when any of its
    /// ancestors is blocking.
    pub fn inherit_blocking(mut self, yes: bool) -> Self {
        self.inherit_blocking = yes;
        self
    }

    /// Evaluates `rules` in order. `ancestors` is the chain of rules above
    /// this list (root first); it is restored before returning.
    pub fn evaluate<'s>(
        &self,
        rules: &'s [Rule],
        ancestors: &mut Vec<&'s Rule>,
        scope: &mut Scope,
        failures: &mut FailureCollector,
    ) -> Result<Flow> {
        for rule in rules {
            if rule.disabled {
                trace!(rule = rule.label(), "skipping disabled rule");
                continue;
            }
            let Some(kind) = rule.kind() else {
                return Err(ValidationError::Structure {
                    owner: ancestors.last().map_or("<root>", |p| p.label()).to_string(),
                    field: "rules",
                    index: position(rules, rule),
                });
            };
            self.enter(rule, ancestors, scope)?;

            let flow = match kind {
                NodeKind::Interstitial(id) => {
                    let action = self
                        .resolver
                        .interstitial(id)
                        .ok_or_else(|| ValidationError::UnknownInterstitial(id.to_string()))?;
                    let params = template::apply_all(&rule.params, &scope.data)?;
                    check_arity(id, action.arity(), params.len())?;
                    trace!(interstitial = id, depth = ancestors.len(), "running interstitial");
                    action.call(&params, scope)?;
                    self.descend(rule, "rules", &rule.rules, ancestors, scope, failures)?
                }
                NodeKind::Validator(id) => {
                    let predicate = self
                        .resolver
                        .validator(id)
                        .ok_or_else(|| ValidationError::UnknownValidator(id.to_string()))?;
                    let params = template::apply_all(&rule.params, &scope.data)?;
                    check_arity(id, predicate.arity(), params.len())?;
                    let passed = predicate.call(&params, scope)?;
                    trace!(validator = id, passed, depth = ancestors.len(), "checked rule");

                    if passed {
                        self.descend(rule, "rules", &rule.rules, ancestors, scope, failures)?
                    } else if rule.funnel {
                        debug!(validator = id, "funnel closed");
                        self.descend(rule, "alternatives", &rule.alternatives, ancestors, scope, failures)?
                    } else {
                        debug!(validator = id, "rule failed");
                        failures.record(rule, ancestors);
                        match self.descend(rule, "alternatives", &rule.alternatives, ancestors, scope, failures)? {
                            Flow::StopAll => Flow::StopAll,
                            Flow::Continue if self.is_blocking(rule, ancestors) => {
                                debug!(validator = id, "blocking failure, aborting pass");
                                Flow::StopAll
                            }
                            Flow::Continue => Flow::Continue,
                        }
                    }
                }
            };
            if flow == Flow::StopAll {
                return Ok(Flow::StopAll);
            }
        }
        Ok(Flow::Continue)
    }

    fn descend<'s>(
        &self,
        owner: &'s Rule,
        field: &'static str,
        children: &'s [Rule],
        ancestors: &mut Vec<&'s Rule>,
        scope: &mut Scope,
        failures: &mut FailureCollector,
    ) -> Result<Flow> {
        if children.is_empty() {
            return Ok(Flow::Continue);
        }
        ensure_homogeneous(owner, field, children)?;
        ancestors.push(owner);
        let flow = self.evaluate(children, ancestors, scope, failures);
        ancestors.pop();
        flow
    }

    fn is_blocking(&self, rule: &Rule, ancestors: &[&Rule]) -> bool {
        rule.blocking || (self.inherit_blocking && ancestors.iter().rev().any(|a| a.blocking))
    }

    /// Exposes the current rule and its parent to templates and callables.
    fn enter(&self, rule: &Rule, ancestors: &[&Rule], scope: &mut Scope) -> Result<()> {
        let parent = match ancestors.last() {
            Some(p) => p.to_value()?,
            None => Value::Null,
        };
        scope.data.insert(THIS_KEY, rule.to_value()?);
        scope.data.insert(PARENT_KEY, parent);
        Ok(())
    }
}

fn position(rules: &[Rule], rule: &Rule) -> usize {
    rules
        .iter()
        .position(|r| std::ptr::eq(r, rule))
        .unwrap_or_default()
}

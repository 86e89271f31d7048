use serde_json::Value;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::context::Scope;
use crate::errors::{Result, ValidationError};

pub mod args;
pub mod array;
pub mod data;
pub mod integer;
pub mod string;

/// A pass/fail check invoked by `validator` nodes.
pub trait Predicate: Send + Sync {
    fn name(&self) -> &str;
    fn arity(&self) -> RangeInclusive<usize>;
    fn call(&self, args: &[Value], scope: &mut Scope) -> Result<bool>;
}

/// A side-effecting action invoked by `interstitial` nodes.
pub trait Interstitial: Send + Sync {
    fn name(&self) -> &str;
    fn arity(&self) -> RangeInclusive<usize>;
    fn call(&self, args: &[Value], scope: &mut Scope) -> Result<()>;
}

/// Maps identifiers found in the rule tree to callables.
pub trait Resolver {
    fn validator(&self, id: &str) -> Option<Arc<dyn Predicate>>;
    fn interstitial(&self, id: &str) -> Option<Arc<dyn Interstitial>>;
}

/// Fails with [`ValidationError::Arity`] when `got` is outside `arity`.
pub fn check_arity(name: &str, arity: RangeInclusive<usize>, got: usize) -> Result<()> {
    if arity.contains(&got) {
        return Ok(());
    }
    let expected = if arity.start() == arity.end() {
        arity.start().to_string()
    } else {
        format!("{}..={}", arity.start(), arity.end())
    };
    Err(ValidationError::Arity { name: name.to_string(), expected, got })
}

/// Thread-safe registry, cheap to clone.
#[derive(Clone, Default)]
pub struct Registry {
    validators: Arc<HashMap<String, Arc<dyn Predicate>>>,
    interstitials: Arc<HashMap<String, Arc<dyn Interstitial>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        string::register(&mut registry);
        integer::register(&mut registry);
        array::register(&mut registry);
        data::register(&mut registry);
        registry
    }

    pub fn register_validator<P: Predicate + 'static>(&mut self, p: P) {
        let map = Arc::make_mut(&mut self.validators);
        map.insert(p.name().to_string(), Arc::new(p));
    }

    pub fn register_interstitial<I: Interstitial + 'static>(&mut self, i: I) {
        let map = Arc::make_mut(&mut self.interstitials);
        map.insert(i.name().to_string(), Arc::new(i));
    }

    /// Registers a closure as a predicate.
    pub fn validator_fn<F>(&mut self, name: impl Into<String>, arity: RangeInclusive<usize>, f: F)
    where
        F: Fn(&[Value], &mut Scope) -> Result<bool> + Send + Sync + 'static,
    {
        self.register_validator(FnPredicate { name: name.into(), arity, f });
    }

    /// Registers a closure as an interstitial.
    pub fn interstitial_fn<F>(&mut self, name: impl Into<String>, arity: RangeInclusive<usize>, f: F)
    where
        F: Fn(&[Value], &mut Scope) -> Result<()> + Send + Sync + 'static,
    {
        self.register_interstitial(FnInterstitial { name: name.into(), arity, f });
    }

    pub fn contains_validator(&self, id: &str) -> bool {
        self.validators.contains_key(id)
    }

    pub fn contains_interstitial(&self, id: &str) -> bool {
        self.interstitials.contains_key(id)
    }
}

impl Resolver for Registry {
    fn validator(&self, id: &str) -> Option<Arc<dyn Predicate>> {
        self.validators.get(id).cloned()
    }

    fn interstitial(&self, id: &str) -> Option<Arc<dyn Interstitial>> {
        self.interstitials.get(id).cloned()
    }
}

struct FnPredicate<F> {
    name: String,
    arity: RangeInclusive<usize>,
    f: F,
}

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&[Value], &mut Scope) -> Result<bool> + Send + Sync,
{
    fn name(&self) -> &str { &self.name }
    fn arity(&self) -> RangeInclusive<usize> { self.arity.clone() }
    fn call(&self, args: &[Value], scope: &mut Scope) -> Result<bool> {
        (self.f)(args, scope)
    }
}

struct FnInterstitial<F> {
    name: String,
    arity: RangeInclusive<usize>,
    f: F,
}

impl<F> Interstitial for FnInterstitial<F>
where
    F: Fn(&[Value], &mut Scope) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str { &self.name }
    fn arity(&self) -> RangeInclusive<usize> { self.arity.clone() }
    fn call(&self, args: &[Value], scope: &mut Scope) -> Result<()> {
        (self.f)(args, scope)
    }
}

/// Registers a pure `fn(&[Value]) -> Result<bool>` under `name`.
pub(crate) fn pure(
    registry: &mut Registry,
    name: &'static str,
    arity: RangeInclusive<usize>,
    f: fn(&[Value]) -> Result<bool>,
) {
    registry.validator_fn(name, arity, move |args, _scope| f(args));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn closures_resolve_and_run() {
        let mut registry = Registry::new();
        registry.validator_fn("always", 0..=0, |_, _| Ok(true));
        let p = registry.validator("always").unwrap();
        assert!(p.call(&[], &mut Scope::default()).unwrap());
        assert!(registry.validator("never").is_none());
        assert!(registry.interstitial("always").is_none());
    }

    #[test]
    fn clones_do_not_see_later_registrations() {
        let base = Registry::with_builtins();
        let mut extended = base.clone();
        extended.validator_fn("custom", 1..=1, |args, _| Ok(args[0] == json!(1)));
        assert!(extended.contains_validator("custom"));
        assert!(!base.contains_validator("custom"));
        assert!(base.contains_validator("string.not_empty"));
    }

    #[test]
    fn arity_messages() {
        assert!(check_arity("x", 1..=2, 2).is_ok());
        let err = check_arity("x", 1..=1, 3).unwrap_err();
        assert_eq!(err.to_string(), "`x` expects 1 arguments, got 3");
        let err = check_arity("x", 1..=3, 0).unwrap_err();
        assert_eq!(err.to_string(), "`x` expects 1..=3 arguments, got 0");
    }
}

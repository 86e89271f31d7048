//! Predicates and interstitials that work on the data context itself.

use serde_json::Value;

use super::{args, pure, Registry};
use crate::errors::Result;

pub(crate) fn register(registry: &mut Registry) {
    pure(registry, "data.included", 2..=2, included);

    registry.interstitial_fn("data.set", 2..=2, |a, scope| {
        let key = args::key("data.set", a, 0)?;
        scope.data.insert(key, args::value("data.set", a, 1)?.clone());
        Ok(())
    });
    registry.interstitial_fn("data.store", 2..=2, |a, scope| {
        let key = args::key("data.store", a, 0)?;
        scope.store(key, args::value("data.store", a, 1)?.clone());
        Ok(())
    });
}

/// `key` is present (and not null) in `object`.
pub fn included(a: &[Value]) -> Result<bool> {
    let key = args::key("data.included", a, 0)?;
    let obj = args::object("data.included", a, 1)?;
    Ok(obj.get(&key).is_some_and(|v| !v.is_null()))
}

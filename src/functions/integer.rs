//! `integer.*` predicates. Numeric strings are accepted for every operand.

use serde_json::Value;

use super::{args, pure, Registry};
use crate::errors::Result;

pub(crate) fn register(registry: &mut Registry) {
    pure(registry, "integer.between", 3..=3, between);
    pure(registry, "integer.greater_than", 2..=2, |a| compare("integer.greater_than", a, |x, y| x > y));
    pure(registry, "integer.greater_than_or_equal_to", 2..=2, |a| {
        compare("integer.greater_than_or_equal_to", a, |x, y| x >= y)
    });
    pure(registry, "integer.less_than", 2..=2, |a| compare("integer.less_than", a, |x, y| x < y));
    pure(registry, "integer.less_than_or_equal_to", 2..=2, |a| {
        compare("integer.less_than_or_equal_to", a, |x, y| x <= y)
    });
}

/// Inclusive on both ends.
pub fn between(a: &[Value]) -> Result<bool> {
    let n = args::int("integer.between", a, 0)?;
    let min = args::int("integer.between", a, 1)?;
    let max = args::int("integer.between", a, 2)?;
    Ok((min..=max).contains(&n))
}

fn compare(name: &str, a: &[Value], op: fn(i64, i64) -> bool) -> Result<bool> {
    Ok(op(args::int(name, a, 0)?, args::int(name, a, 1)?))
}

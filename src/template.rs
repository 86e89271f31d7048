use serde_json::Value;

use crate::context::DataContext;
use crate::errors::{Result, ValidationError};
use crate::parser::find_token;

/// Outcome of templating one parameter.
///
/// The two shapes are deliberately asymmetric: a string lookup is spliced
/// into the surrounding text, anything else replaces the parameter whole.
#[derive(Debug, Clone, PartialEq)]
pub enum Templated {
    Literal(Value),
    Interpolated(String),
}

impl Templated {
    pub fn into_value(self) -> Value {
        match self {
            Templated::Literal(v) => v,
            Templated::Interpolated(s) => Value::String(s),
        }
    }
}

/// Resolves a single parameter against the context.
pub fn apply(param: &Value, data: &DataContext) -> Result<Templated> {
    match param {
        Value::String(s) => apply_str(s, data),
        Value::Array(items) => Ok(Templated::Literal(Value::Array(apply_all(items, data)?))),
        other => Ok(Templated::Literal(other.clone())),
    }
}

/// Resolves a parameter list, element by element.
pub fn apply_all(params: &[Value], data: &DataContext) -> Result<Vec<Value>> {
    params
        .iter()
        .map(|p| apply(p, data).map(Templated::into_value))
        .collect()
}

fn apply_str(s: &str, data: &DataContext) -> Result<Templated> {
    let Some(token) = find_token(s) else {
        return Ok(Templated::Interpolated(s.to_string()));
    };
    let resolved = data
        .get(token.identifier)
        .or_else(|| data.lookup_path(token.identifier))
        .ok_or_else(|| ValidationError::Formatting {
            identifier: token.identifier.to_string(),
        })?;
    Ok(match resolved {
        Value::String(replacement) => {
            let mut out = String::with_capacity(s.len() + replacement.len());
            out.push_str(&s[..token.start]);
            out.push_str(replacement);
            out.push_str(&s[token.end..]);
            Templated::Interpolated(out)
        }
        other => Templated::Literal(other.clone()),
    })
}

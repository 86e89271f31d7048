pub mod collector;
pub mod context;
pub mod engine;
pub mod errors;
pub mod filter;
pub mod functions;
pub mod parser;
pub mod rule;
pub mod schema;
pub mod template;
pub mod walker;

use serde_json::Value;

pub use collector::{FailedRule, FailureCollector};
pub use context::{DataContext, Scope};
pub use engine::{EngineOptions, SchemaValidator};
pub use errors::{Result, ValidationError};
pub use functions::{Interstitial, Predicate, Registry, Resolver};
pub use rule::Rule;
pub use schema::Schema;
pub use template::Templated;
pub use walker::{Flow, Walker};

/// Convenience: validate `data` against a JSON schema string with the
/// builtin registry. Returns the outcome and the failed rules (parents kept).
pub fn validate(schema: &str, data: Value) -> Result<(bool, Vec<FailedRule>)> {
    let schema: Schema = schema.parse()?;
    let mut validator = SchemaValidator::new(schema, DataContext::from_value(data)?);
    let valid = validator.valid()?;
    Ok((valid, validator.failed_rules(true)))
}

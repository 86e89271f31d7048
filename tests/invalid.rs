use rule_tree_validation::{
    DataContext, EngineOptions, Registry, Rule, Schema, SchemaValidator, ValidationError,
};
use serde_json::json;

fn run(rules: Vec<Rule>, registry: Registry) -> Result<bool, ValidationError> {
    let data = DataContext::from_value(json!({"present": "yes"})).unwrap();
    SchemaValidator::with_resolver(Schema::new(rules), data, registry, EngineOptions::default()).valid()
}

#[test]
fn test_missing_placeholder_is_a_formatting_error() {
    let rules = vec![Rule::validator("string.not_empty").with_params(vec![json!("{missing}")])];
    match run(rules, Registry::with_builtins()) {
        Err(ValidationError::Formatting { identifier }) => assert_eq!(identifier, "missing"),
        other => panic!("expected formatting error, got {other:?}"),
    }
}

#[test]
fn test_formatting_error_in_blocking_rule_is_not_swallowed() {
    let rules = vec![
        Rule::validator("string.not_empty").with_params(vec![json!("{present}")]).blocking(),
        Rule::validator("string.not_empty").with_params(vec![json!("{nope.deeper}")]).blocking(),
    ];
    let err = run(rules, Registry::with_builtins()).unwrap_err();
    assert!(matches!(err, ValidationError::Formatting { .. }));
}

#[test]
fn test_non_homogeneous_alternatives_are_a_structure_error() {
    let rules = vec![Rule::validator("string.not_empty")
        .with_params(vec![json!("")])
        .with_alternatives(vec![Rule::default().with_params(vec![json!(1)])])];
    let err = run(rules, Registry::with_builtins()).unwrap_err();
    assert!(matches!(err, ValidationError::Structure { field: "alternatives", index: 0, .. }));
}

#[test]
fn test_callable_errors_propagate_unchanged() {
    let mut registry = Registry::new();
    registry.validator_fn("explode", 0..=0, |_, _| {
        Err(ValidationError::Argument { name: "explode".into(), message: "boom".into() })
    });
    let rules = vec![Rule::validator("explode").blocking()];
    let err = run(rules, registry).unwrap_err();
    assert_eq!(err.to_string(), "`explode`: boom");
}

#[test]
fn test_wrong_argument_count_is_reported() {
    let rules = vec![Rule::validator("string.not_empty")];
    let err = run(rules, Registry::with_builtins()).unwrap_err();
    assert!(matches!(err, ValidationError::Arity { got: 0, .. }));
}

#[test]
fn test_unknown_interstitial() {
    let rules = vec![Rule::interstitial("nowhere")];
    let err = run(rules, Registry::with_builtins()).unwrap_err();
    assert!(matches!(err, ValidationError::UnknownInterstitial(_)));
}

#[test]
fn test_non_object_data_is_rejected() {
    let err = rule_tree_validation::validate("[]", json!("scalar")).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidData(_)));
}

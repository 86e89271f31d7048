use proptest::prelude::*;
use rule_tree_validation::template::{apply, Templated};
use rule_tree_validation::{DataContext, EngineOptions, Registry, Rule, Schema, SchemaValidator};
use serde_json::json;

#[derive(Debug, Clone)]
struct Node {
    pass: bool,
    children: Vec<Node>,
}

fn node() -> impl Strategy<Value = Node> {
    let leaf = any::<bool>().prop_map(|pass| Node { pass, children: Vec::new() });
    leaf.prop_recursive(4, 48, 4, |inner| {
        (any::<bool>(), prop::collection::vec(inner, 0..4))
            .prop_map(|(pass, children)| Node { pass, children })
    })
}

/// Builds rules labelled in pre-order and returns the labels expected to fail.
fn build(nodes: &[Node], next: &mut usize, expected: &mut Vec<String>) -> Vec<Rule> {
    nodes
        .iter()
        .map(|n| {
            let label = next.to_string();
            *next += 1;
            let children = if n.pass {
                build(&n.children, next, expected)
            } else {
                expected.push(label.clone());
                // Still consume labels so numbering stays stable.
                build(&n.children, next, &mut Vec::new())
            };
            Rule::validator("check")
                .with_params(vec![json!(n.pass), json!(label)])
                .with_rules(children)
        })
        .collect()
}

proptest! {
    #[test]
    fn failures_follow_preorder(nodes in prop::collection::vec(node(), 0..5)) {
        let mut expected = Vec::new();
        let rules = build(&nodes, &mut 0, &mut expected);

        let mut registry = Registry::new();
        registry.validator_fn("check", 2..=2, |args, _| Ok(args[0] == json!(true)));
        let mut v = SchemaValidator::with_resolver(
            Schema::new(rules),
            DataContext::new(),
            registry,
            EngineOptions::default(),
        );
        let valid = v.valid().unwrap();
        let failed: Vec<String> = v
            .failed_rules(false)
            .iter()
            .map(|f| f.rule.params[1].as_str().unwrap().to_string())
            .collect();
        prop_assert_eq!(valid, expected.is_empty());
        prop_assert_eq!(failed, expected);
    }

    #[test]
    fn strings_without_braces_pass_through(s in "[^{}]*") {
        let out = apply(&json!(s.clone()), &DataContext::new()).unwrap();
        prop_assert_eq!(out, Templated::Interpolated(s));
    }

    #[test]
    fn integer_lookups_stay_integers(k in any::<i64>(), suffix in "[a-z ]{0,8}") {
        let data = DataContext::from_value(json!({"k": k})).unwrap();
        let out = apply(&json!(format!("{{k}}{suffix}")), &data).unwrap();
        prop_assert_eq!(out, Templated::Literal(json!(k)));
    }

    #[test]
    fn string_lookups_are_spliced(value in "[a-z]{0,12}", suffix in "[a-z]{0,4}") {
        let data = DataContext::from_value(json!({"name": value.clone()})).unwrap();
        let out = apply(&json!(format!("{{name}}{suffix}")), &data).unwrap();
        prop_assert_eq!(out, Templated::Interpolated(format!("{value}{suffix}")));
    }
}

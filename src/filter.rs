use crate::rule::Rule;

/// Tag selecting rules meant for client-side evaluation.
pub const CLIENT: &str = "client";
/// Tag selecting rules meant for server-side evaluation.
pub const SERVER: &str = "server";

/// Returns a pruned copy of `rules` keeping only what applies to `tag`.
///
/// A rule without a `range` belongs to every target. A rule whose `range`
/// omits `tag` is dropped along with its subtree; kept rules have their
/// `rules` pruned the same way. Nothing else about a rule is inspected.
pub fn limit(rules: &[Rule], tag: &str) -> Vec<Rule> {
    rules
        .iter()
        .filter(|rule| in_range(rule, tag))
        .map(|rule| {
            let mut kept = rule.clone();
            kept.rules = limit(&rule.rules, tag);
            kept
        })
        .collect()
}

fn in_range(rule: &Rule, tag: &str) -> bool {
    rule.range
        .as_ref()
        .map_or(true, |range| range.iter().any(|t| t == tag))
}

//! `string.*` predicates.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use super::{args, pure, Registry};
use crate::errors::{Result, ValidationError};

pub(crate) fn register(registry: &mut Registry) {
    pure(registry, "string.not_empty", 1..=1, not_empty);
    pure(registry, "string.email", 1..=1, email);
    pure(registry, "string.not_email", 1..=1, |a| email(a).map(|ok| !ok));
    pure(registry, "string.url", 1..=1, url);
    pure(registry, "string.email_or_url", 1..=1, |a| Ok(email(a)? || url(a)?));
    pure(registry, "string.empty_or_email", 1..=1, |a| Ok(!not_empty(a)? || email(a)?));
    pure(registry, "string.empty_or_url", 1..=1, |a| Ok(!not_empty(a)? || url(a)?));
    pure(registry, "string.min_length", 2..=2, min_length);
    pure(registry, "string.max_length", 2..=2, max_length);
    pure(registry, "string.contains", 2..=2, contains);
    pure(registry, "string.does_not_contain", 2..=2, |a| contains(a).map(|ok| !ok));
    pure(registry, "string.begins_with", 2..=2, begins_with);
    pure(registry, "string.equals", 2..=2, equals);
    pure(registry, "string.in_list", 2..=2, in_list);
    pure(registry, "string.is_alpha_numeric", 1..=3, is_alpha_numeric);
    pure(registry, "string.is_mobile_number", 1..=1, is_mobile_number);
    pure(registry, "string.is_json", 1..=1, is_json);
    pure(registry, "string.matches", 2..=2, matches);
}

pub fn not_empty(a: &[Value]) -> Result<bool> {
    Ok(!args::text("string.not_empty", a, 0)?.trim().is_empty())
}

/// Dot-separated atoms in the local part (no leading, trailing or doubled
/// dots, no quotes or angle brackets) and a domain with at least one dot.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$",
    )
    .expect("email pattern compiles")
});

/// `http`/`https` only, optional userinfo and port, then any non-space tail.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i:https?)://(?:[^\s/?#@]+@)?[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*(?::[0-9]{1,5})?(?:[/?#]\S*)?$",
    )
    .expect("url pattern compiles")
});

pub fn email(a: &[Value]) -> Result<bool> {
    Ok(EMAIL_REGEX.is_match(args::text("string.email", a, 0)?))
}

pub fn url(a: &[Value]) -> Result<bool> {
    Ok(URL_REGEX.is_match(args::text("string.url", a, 0)?))
}

pub fn min_length(a: &[Value]) -> Result<bool> {
    let s = args::text("string.min_length", a, 0)?;
    let min = args::int("string.min_length", a, 1)?;
    Ok(s.chars().count() as i64 >= min)
}

pub fn max_length(a: &[Value]) -> Result<bool> {
    let s = args::text("string.max_length", a, 0)?;
    let max = args::int("string.max_length", a, 1)?;
    Ok(s.chars().count() as i64 <= max)
}

pub fn contains(a: &[Value]) -> Result<bool> {
    let s = args::text("string.contains", a, 0)?;
    Ok(s.contains(args::text("string.contains", a, 1)?))
}

pub fn begins_with(a: &[Value]) -> Result<bool> {
    let s = args::text("string.begins_with", a, 0)?;
    Ok(s.starts_with(args::text("string.begins_with", a, 1)?))
}

pub fn equals(a: &[Value]) -> Result<bool> {
    Ok(args::text("string.equals", a, 0)? == args::text("string.equals", a, 1)?)
}

/// Strict membership: `"1"` is not in `[1]`.
pub fn in_list(a: &[Value]) -> Result<bool> {
    let s = args::text("string.in_list", a, 0)?;
    let list = args::array("string.in_list", a, 1)?;
    Ok(list.iter().any(|v| v.as_str() == Some(s)))
}

pub fn is_alpha_numeric(a: &[Value]) -> Result<bool> {
    let s = args::text("string.is_alpha_numeric", a, 0)?;
    let periods = args::flag("string.is_alpha_numeric", a, 1)?;
    let dashes = args::flag("string.is_alpha_numeric", a, 2)?;
    Ok(!s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || (periods && c == '.') || (dashes && c == '-')
        }))
}

/// Expects `+` followed by digits only.
pub fn is_mobile_number(a: &[Value]) -> Result<bool> {
    let s = args::text("string.is_mobile_number", a, 0)?;
    Ok(s.strip_prefix('+')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())))
}

/// True only for JSON objects and arrays.
pub fn is_json(a: &[Value]) -> Result<bool> {
    let s = args::text("string.is_json", a, 0)?;
    Ok(matches!(
        serde_json::from_str::<Value>(s),
        Ok(Value::Object(_)) | Ok(Value::Array(_))
    ))
}

/// `pattern` may be bare or delimited as `/body/flags` (flags: `i`, `m`, `s`, `x`).
pub fn matches(a: &[Value]) -> Result<bool> {
    let s = args::text("string.matches", a, 0)?;
    let pattern = args::text("string.matches", a, 1)?;
    let (body, flags) = split_delimited(pattern);
    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => {
                return Err(ValidationError::Argument {
                    name: "string.matches".into(),
                    message: format!("unsupported pattern flag `{other}`"),
                })
            }
        };
    }
    let re = builder.build().map_err(|e| ValidationError::Argument {
        name: "string.matches".into(),
        message: e.to_string(),
    })?;
    Ok(re.is_match(s))
}

fn split_delimited(pattern: &str) -> (&str, &str) {
    if let Some(inner) = pattern.strip_prefix('/') {
        if let Some(end) = inner.rfind('/') {
            return (&inner[..end], &inner[end + 1..]);
        }
    }
    (pattern, "")
}

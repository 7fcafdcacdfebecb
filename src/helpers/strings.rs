// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Scalar string transforms.
//!
//! Each helper wraps a pure function kept separate so the transforms stay
//! trivially testable. All of them coerce their input through
//! [`value_to_string`], so numbers and booleans are accepted wherever a
//! string is.

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, ScopedJson,
};
use inflector::Inflector;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::value_to_string;

pub(crate) fn register(reg: &mut Handlebars<'_>) {
    register_transform(reg, "trim", |v: &Value| Value::String(hyphenate(&value_to_string(v))));
    register_transform(reg, "cleanString", |v: &Value| {
        Value::String(clean(&value_to_string(v)))
    });
    register_transform(reg, "emailFormat", |v: &Value| {
        Value::String(email_format(&value_to_string(v)))
    });
    register_transform(reg, "upperCase", |v: &Value| {
        Value::String(upper_first(&value_to_string(v)))
    });
    register_transform(reg, "lowerCase", |v: &Value| {
        Value::String(value_to_string(v).to_lowercase())
    });
    register_transform(reg, "pluralize", |v: &Value| {
        Value::String(value_to_string(v).to_plural())
    });
    register_transform(reg, "trimPluralize", |v: &Value| {
        Value::String(hyphenate(&value_to_string(v).to_plural()))
    });
    register_transform(reg, "secureUrl", |v: &Value| match v {
        Value::Null => Value::Null,
        other => Value::String(secure(&value_to_string(other))),
    });
    register_transform(reg, "removePara", |v: &Value| match v {
        Value::String(s) => first_paragraph(s)
            .map(|p| Value::String(p.to_string()))
            .unwrap_or(Value::Null),
        _ => Value::Null,
    });
    register_transform(reg, "incIndex", |v: &Value| {
        as_index(v).map(|i| Value::from(i + 1)).unwrap_or(Value::Null)
    });
    reg.register_helper("limit", Box::new(LimitHelper));
}

/// Adapter registering a pure `Value -> Value` transform of the first
/// positional argument as a helper.
struct Transform(fn(&Value) -> Value);

impl HelperDef for Transform {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let input = h.param(0).map(|p| p.value()).unwrap_or(&Value::Null);
        Ok(ScopedJson::Derived((self.0)(input)))
    }
}

fn register_transform(reg: &mut Handlebars<'_>, name: &str, f: fn(&Value) -> Value) {
    reg.register_helper(name, Box::new(Transform(f)));
}

/// Lowercase with spaces hyphenated, for slug-like display. Idempotent.
fn hyphenate(s: &str) -> String {
    s.to_lowercase().replace(' ', "-")
}

/// Truncates to `length` characters and appends `...`, only when the input
/// is strictly longer.
fn limit(s: &str, length: usize) -> String {
    if s.chars().count() <= length {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(length).collect();
        out.push_str("...");
        out
    }
}

const SPECIALS: &[char] = &[
    '\\', '"', '-', '[', ']', '{', '}', '(', ')', '*', '+', '?', '.', '^', '$', '|',
];

fn clean(s: &str) -> String {
    s.chars().filter(|c| !SPECIALS.contains(c)).collect()
}

/// Obfuscates the first `@` for display, e.g. `jane@example.com` ->
/// `jane at example.com`.
fn email_format(s: &str) -> String {
    s.replacen('@', " at ", 1)
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn secure(s: &str) -> String {
    match s.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => s.to_string(),
    }
}

static FIRST_PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<p>(.*?)</p>").unwrap());

fn first_paragraph(s: &str) -> Option<&str> {
    FIRST_PARAGRAPH
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn as_index(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// `{{limit description 80}}` — ellipsis truncation past a character count.
#[derive(Clone, Copy)]
pub struct LimitHelper;

impl HelperDef for LimitHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let input = h.param(0).map(|p| value_to_string(p.value())).unwrap_or_default();
        let length = h
            .param(1)
            .map(|p| p.value())
            .and_then(as_index)
            .and_then(|n| usize::try_from(n).ok());
        let output = match length {
            Some(length) => limit(&input, length),
            None => input,
        };
        Ok(ScopedJson::Derived(Value::String(output)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handlebars::Handlebars;
    use serde_json::json;

    fn render(template: &str, data: &serde_json::Value) -> String {
        let mut reg = Handlebars::new();
        super::register(&mut reg);
        reg.render_template(template, data).unwrap()
    }

    #[test]
    fn trim_hyphenates_and_lowercases() {
        assert_eq!(hyphenate("Hello World"), "hello-world");
        assert_eq!(hyphenate(hyphenate("Hello World").as_str()), "hello-world");
        assert_eq!(render("{{trim name}}", &json!({"name": "Case Studies"})), "case-studies");
    }

    #[test]
    fn limit_appends_ellipsis_only_past_length() {
        assert_eq!(limit("hello", 10), "hello");
        assert_eq!(limit("hello", 5), "hello");
        assert_eq!(limit("hello world", 5), "hello...");
        assert_eq!(render("{{limit text 4}}", &json!({"text": "abcdef"})), "abcd...");
    }

    #[test]
    fn clean_string_removes_specials() {
        assert_eq!(clean(r#"a\b"c-d[e]{f}(g)*h+i?j.k^l$m|n"#), "abcdefghijklmn");
        assert_eq!(clean("plain text"), "plain text");
    }

    #[test]
    fn email_format_replaces_first_at_only() {
        assert_eq!(email_format("jane@example.com"), "jane at example.com");
        assert_eq!(email_format("a@b@c"), "a at b@c");
    }

    #[test]
    fn upper_first_is_empty_safe() {
        assert_eq!(upper_first("hello world"), "Hello world");
        assert_eq!(upper_first(""), "");
        assert_eq!(render("{{upperCase name}}", &json!({})), "");
    }

    #[test]
    fn secure_url_rewrites_scheme_once() {
        assert_eq!(secure("http://x"), "https://x");
        assert_eq!(secure("https://x"), "https://x");
        assert_eq!(secure("ftp://x"), "ftp://x");
        // null passes through untouched and renders as nothing
        assert_eq!(render("{{secureUrl missing}}", &json!({})), "");
    }

    #[test]
    fn remove_para_takes_first_paragraph_non_greedy() {
        assert_eq!(first_paragraph("<p>Hello</p>"), Some("Hello"));
        assert_eq!(first_paragraph("<p>a</p><p>b</p>"), Some("a"));
        assert_eq!(first_paragraph("no paragraph"), None);
        assert_eq!(render("{{removePara html}}", &json!({"html": "x<p>kept</p>y"})), "kept");
        assert_eq!(render("{{removePara html}}", &json!({"html": "plain"})), "");
    }

    #[test]
    fn inc_index_accepts_numeric_strings() {
        assert_eq!(render("{{incIndex 0}}", &json!({})), "1");
        assert_eq!(render("{{incIndex i}}", &json!({"i": "4"})), "5");
        assert_eq!(render("{{incIndex i}}", &json!({"i": "x"})), "");
    }

    #[test]
    fn pluralize_and_trim_pluralize_compose() {
        assert_eq!(render("{{pluralize word}}", &json!({"word": "category"})), "categories");
        assert_eq!(
            render("{{trimPluralize word}}", &json!({"word": "Case Study"})),
            "case-studies"
        );
    }
}

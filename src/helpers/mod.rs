// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Helper implementations plus the calling-convention support they share.

use handlebars::{Handlebars, Helper, JsonTruthy};
use serde_json::Value;

use crate::config::HelperConfig;
use crate::error::Error;

pub mod dates;
pub mod flow;
pub mod json;
pub mod markup;
pub mod media;
pub mod strings;

pub(crate) fn register_all(reg: &mut Handlebars<'_>, config: &HelperConfig) -> Result<(), Error> {
    flow::register(reg);
    dates::register(reg);
    media::register(reg, config)?;
    markup::register(reg);
    json::register(reg);
    strings::register(reg);
    Ok(())
}

/// How a helper with an optional leading context argument was invoked.
///
/// Templates may call such helpers with an explicit context
/// (`{{date item.created format="%Y"}}`) or with options alone
/// (`{{date timeago=true}}`), in which case the context comes from the
/// current rendering scope. Every optional-context helper normalizes the two
/// shapes through this one type instead of re-deciding per helper.
pub(crate) enum CallShape<'a> {
    /// The template supplied a positional context value.
    WithContext(&'a Value),
    /// Only keyword options were supplied.
    OptionsOnly,
}

impl<'a> CallShape<'a> {
    pub(crate) fn of(h: &'a Helper<'_>) -> Self {
        match h.param(0) {
            Some(param) => CallShape::WithContext(param.value()),
            None => CallShape::OptionsOnly,
        }
    }

    /// The explicit context, or the whole rendering scope.
    pub(crate) fn value_or_scope(&self, scope: &'a Value) -> &'a Value {
        match self {
            CallShape::WithContext(value) => value,
            CallShape::OptionsOnly => scope,
        }
    }

    /// The explicit context, or a named field of the rendering scope.
    pub(crate) fn value_or_field(&self, scope: &'a Value, field: &str) -> Option<&'a Value> {
        match self {
            CallShape::WithContext(value) => Some(value),
            CallShape::OptionsOnly => scope.get(field),
        }
    }
}

/// String coercion for scalar template values. Null coerces to the empty
/// string so missing data renders as nothing.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Loose equality used by the conditional block helpers: equal JSON values,
/// or a numeric match once numbers, numeric strings, and booleans are
/// coerced. Template values frequently arrive as strings even when they mean
/// numbers, so `1` and `"1"` compare equal here.
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Non-empty string from a hash option.
pub(crate) fn hash_str(h: &Helper<'_>, name: &str) -> Option<String> {
    h.hash_get(name)
        .map(|v| value_to_string(v.value()))
        .filter(|s| !s.is_empty())
}

/// Truthiness of a hash option; absent means false.
pub(crate) fn hash_bool(h: &Helper<'_>, name: &str) -> bool {
    h.hash_get(name)
        .map(|v| v.value().is_truthy(false))
        .unwrap_or(false)
}

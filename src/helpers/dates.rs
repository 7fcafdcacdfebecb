// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The `date` helper: absolute formatting and relative "time ago" phrasing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use handlebars::{Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, ScopedJson};
use serde_json::Value;

use super::{hash_bool, hash_str, CallShape};

pub(crate) fn register(reg: &mut Handlebars<'_>) {
    reg.register_helper("date", Box::new(DateHelper));
}

/// Renders like "January 5, 2026".
const DEFAULT_FORMAT: &str = "%B %-d, %Y";

/// Scope field consulted when the template supplies no context value.
const SCOPE_FIELD: &str = "publishedDate";

/// `{{date}}`, `{{date item.created format="%d %b %Y"}}`,
/// `{{date item.created timeago=true}}`
///
/// The context value is optional: an options-only call reads `publishedDate`
/// off the current scope, and when that is absent too the current instant is
/// used. `timeago=true` switches to relative phrasing and ignores `format`.
/// Date-like inputs are RFC 3339 strings, `YYYY-MM-DD` dates, and integer
/// epoch milliseconds; anything else renders as the empty string.
#[derive(Clone, Copy)]
pub struct DateHelper;

impl HelperDef for DateHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let shape = CallShape::of(h);
        let scope = rc.evaluate(ctx, "this")?;
        let instant = match shape.value_or_field(scope.as_json(), SCOPE_FIELD) {
            None | Some(Value::Null) => Some(Utc::now()),
            Some(value) => parse_date_value(value),
        };
        let Some(instant) = instant else {
            return Ok(ScopedJson::Derived(Value::String(String::new())));
        };
        let rendered = if hash_bool(h, "timeago") {
            relative_phrase(Utc::now().signed_duration_since(instant))
        } else {
            let format = hash_str(h, "format").unwrap_or_else(|| DEFAULT_FORMAT.to_string());
            instant.format(&format).to_string()
        };
        Ok(ScopedJson::Derived(Value::String(rendered)))
    }
}

fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt));
    }
    None
}

/// Moment-style relative buckets: seconds round up to "a minute" past 90s,
/// to "an hour" past 90min, and so on through days, months, and years.
fn relative_phrase(delta: TimeDelta) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;
    const MONTH: u64 = 30 * DAY;
    const YEAR: u64 = 365 * DAY;

    let future = delta < TimeDelta::zero();
    let secs = delta.num_seconds().unsigned_abs();
    let quantity = if secs < 45 {
        "a few seconds".to_string()
    } else if secs < 90 {
        "a minute".to_string()
    } else if secs < 45 * MINUTE {
        format!("{} minutes", (secs + MINUTE / 2) / MINUTE)
    } else if secs < 90 * MINUTE {
        "an hour".to_string()
    } else if secs < 22 * HOUR {
        format!("{} hours", (secs + HOUR / 2) / HOUR)
    } else if secs < 36 * HOUR {
        "a day".to_string()
    } else if secs < 26 * DAY {
        format!("{} days", (secs + DAY / 2) / DAY)
    } else if secs < 46 * DAY {
        "a month".to_string()
    } else if secs < 320 * DAY {
        format!("{} months", (secs + MONTH / 2) / MONTH)
    } else if secs < 548 * DAY {
        "a year".to_string()
    } else {
        format!("{} years", (secs + YEAR / 2) / YEAR)
    };
    if future {
        format!("in {quantity}")
    } else {
        format!("{quantity} ago")
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Debug JSON helpers.

use handlebars::{
    html_escape, Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    RenderError, ScopedJson,
};
use serde_json::Value;

pub(crate) fn register(reg: &mut Handlebars<'_>) {
    reg.register_helper("jsonPrint", Box::new(JsonPrintHelper));
    reg.register_helper("jsonStr", Box::new(JsonStrHelper));
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// `{{jsonPrint obj}}` — the value pretty-printed inside a `<pre>` block for
/// debug display. The JSON itself is escaped; the wrapping markup is not.
#[derive(Clone, Copy)]
pub struct JsonPrintHelper;

impl HelperDef for JsonPrintHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let value = h.param(0).map(|p| p.value()).unwrap_or(&Value::Null);
        out.write("<pre>")?;
        out.write(&html_escape(&pretty(value)))?;
        out.write("</pre>")?;
        Ok(())
    }
}

/// `{{jsonStr obj}}` — the value as a 2-space-indented JSON string.
#[derive(Clone, Copy)]
pub struct JsonStrHelper;

impl HelperDef for JsonStrHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let value = h.param(0).map(|p| p.value()).unwrap_or(&Value::Null);
        Ok(ScopedJson::Derived(Value::String(pretty(value))))
    }
}

#[cfg(test)]
mod tests {
    use handlebars::Handlebars;
    use serde_json::json;

    fn render(template: &str, data: &serde_json::Value) -> String {
        let mut reg = Handlebars::new();
        super::register(&mut reg);
        reg.render_template(template, data).unwrap()
    }

    #[test]
    fn json_print_wraps_in_pre() {
        let out = render("{{jsonPrint item}}", &json!({"item": {"id": 7}}));
        assert_eq!(out, "<pre>{\n  &quot;id&quot;: 7\n}</pre>");
    }

    #[test]
    fn json_str_uses_two_space_indent() {
        let out = render("{{{jsonStr item}}}", &json!({"item": {"id": 7}}));
        assert_eq!(out, "{\n  \"id\": 7\n}");
    }
}

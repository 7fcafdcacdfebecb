// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Conditional block helpers.

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, Renderable,
};
use serde_json::Value;

use super::loose_eq;

pub(crate) fn register(reg: &mut Handlebars<'_>) {
    reg.register_helper("ifeq", Box::new(IfEqHelper));
    reg.register_helper("ifnoteq", Box::new(IfNotEqHelper));
}

fn params<'a>(h: &'a Helper<'_>) -> (&'a Value, &'a Value) {
    let a = h.param(0).map(|p| p.value()).unwrap_or(&Value::Null);
    let b = h.param(1).map(|p| p.value()).unwrap_or(&Value::Null);
    (a, b)
}

fn render_branch<'reg: 'rc, 'rc>(
    matched: bool,
    h: &Helper<'rc>,
    r: &'reg Handlebars<'reg>,
    ctx: &'rc Context,
    rc: &mut RenderContext<'reg, 'rc>,
    out: &mut dyn Output,
) -> HelperResult {
    let branch = if matched { h.template() } else { h.inverse() };
    match branch {
        Some(template) => template.render(r, ctx, rc, out),
        None => Ok(()),
    }
}

/// `{{#ifeq a b}}...{{else}}...{{/ifeq}}`
///
/// Comparison is loose by design: template values often carry numbers as
/// strings, and `{{#ifeq count "1"}}` should match a numeric `count` of 1.
#[derive(Clone, Copy)]
pub struct IfEqHelper;

impl HelperDef for IfEqHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let (a, b) = params(h);
        render_branch(loose_eq(a, b), h, r, ctx, rc, out)
    }
}

/// `{{#ifnoteq a b}}...{{else}}...{{/ifnoteq}}` — the complement of
/// [`IfEqHelper`], with the same loose comparison.
#[derive(Clone, Copy)]
pub struct IfNotEqHelper;

impl HelperDef for IfNotEqHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let (a, b) = params(h);
        render_branch(!loose_eq(a, b), h, r, ctx, rc, out)
    }
}

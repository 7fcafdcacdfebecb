// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Safe-markup helpers and the [`RawHtml`] wrapper they share.

use std::fmt;

use handlebars::{
    html_escape, Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
};
use serde_json::Value;

use super::value_to_string;

pub(crate) fn register(reg: &mut Handlebars<'_>) {
    reg.register_helper("link", Box::new(LinkHelper));
    reg.register_helper("img", Box::new(ImgHelper));
}

/// Markup whose content was already escaped by the helper that produced it.
///
/// The escape-on-output stage applies to plain values; helpers that build
/// markup escape their inputs themselves and hand the result over as
/// `RawHtml`, which is written to the output stream untouched. Constructors
/// live on the helpers so arbitrary strings cannot be blessed from outside
/// the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHtml(String);

impl RawHtml {
    pub(crate) fn new(html: String) -> Self {
        RawHtml(html)
    }

    /// The pre-escaped markup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn anchor(text: &str, url: &str) -> RawHtml {
    RawHtml::new(format!(
        "<a href=\"{}\">{}</a>",
        html_escape(url),
        html_escape(text)
    ))
}

pub(crate) fn image_tag(src: &str) -> RawHtml {
    RawHtml::new(format!("<img src=\"{}\">", html_escape(src)))
}

/// `{{link title url}}` — an escaped `<a href>` element.
#[derive(Clone, Copy)]
pub struct LinkHelper;

impl HelperDef for LinkHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let text = h.param(0).map(|p| value_to_string(p.value())).unwrap_or_default();
        let url = h.param(1).map(|p| value_to_string(p.value())).unwrap_or_default();
        out.write(anchor(&text, &url).as_str())?;
        Ok(())
    }
}

/// `{{img upload}}` — an `<img>` tag for a stored-file descriptor with
/// `filename` and `path` fields. A leading `./public` is stripped from the
/// path so the URL is server-root relative; a descriptor without a filename
/// renders nothing.
#[derive(Clone, Copy)]
pub struct ImgHelper;

impl HelperDef for ImgHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let descriptor = h.param(0).map(|p| p.value()).unwrap_or(&Value::Null);
        if let Some(src) = file_src(descriptor) {
            out.write(image_tag(&src).as_str())?;
        }
        Ok(())
    }
}

fn file_src(descriptor: &Value) -> Option<String> {
    let filename = descriptor.get("filename").and_then(Value::as_str)?;
    if filename.is_empty() {
        return None;
    }
    let path = descriptor
        .get("path")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let path = path.strip_prefix("./public").unwrap_or(path);
    if path.is_empty() || path.ends_with('/') {
        Some(format!("{path}{filename}"))
    } else {
        Some(format!("{path}/{filename}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, data: &serde_json::Value) -> String {
        let mut reg = Handlebars::new();
        super::register(&mut reg);
        reg.render_template(template, data).unwrap()
    }

    #[test]
    fn link_escapes_text_and_url() {
        let out = render(
            "{{link title url}}",
            &json!({"title": "a < b & c", "url": "/s?q=\"x\""}),
        );
        assert_eq!(
            out,
            "<a href=\"/s?q&#x3D;&quot;x&quot;\">a &lt; b &amp; c</a>"
        );
    }

    #[test]
    fn img_strips_public_prefix() {
        let out = render(
            "{{img upload}}",
            &json!({"upload": {"filename": "photo.jpg", "path": "./public/uploads/"}}),
        );
        assert_eq!(out, "<img src=\"/uploads/photo.jpg\">");
    }

    #[test]
    fn img_without_filename_renders_nothing() {
        let out = render("{{img upload}}", &json!({"upload": {"path": "./public/uploads/"}}));
        assert_eq!(out, "");
        assert_eq!(render("{{img upload}}", &json!({})), "");
    }

    #[test]
    fn file_src_joins_missing_slash() {
        let src = file_src(&json!({"filename": "a.png", "path": "/uploads"})).unwrap();
        assert_eq!(src, "/uploads/a.png");
    }
}

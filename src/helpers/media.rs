// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Media helpers: Cloudinary URLs, CDN assets, and file-type icons.

use std::collections::BTreeMap;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
    ScopedJson,
};
use once_cell::sync::Lazy;
use rand::Rng;
use serde_json::Value;

use super::{hash_str, markup, value_to_string, CallShape};
use crate::cloudinary::{UrlBuilder, UrlOptions};
use crate::config::HelperConfig;
use crate::error::Error;

pub(crate) fn register(reg: &mut Handlebars<'_>, config: &HelperConfig) -> Result<(), Error> {
    let builder = UrlBuilder::new(config.cloud_name.clone())?;
    reg.register_helper(
        "cloudinaryUrl",
        Box::new(CloudinaryUrlHelper {
            builder: builder.clone(),
        }),
    );
    reg.register_helper(
        "cloudinaryImg",
        Box::new(CloudinaryImgHelper {
            builder: builder.clone(),
        }),
    );
    reg.register_helper("cdnAsset", Box::new(CdnAssetHelper { builder }));
    reg.register_helper("fileType", Box::new(FileTypeHelper));
    Ok(())
}

/// Range for the cache-busting version drawn by `cdnAsset`. Fresh per call,
/// never memoized.
const CACHE_BUST_RANGE: std::ops::RangeInclusive<u64> = 1000..=100_000_000;

/// Resolves the image context (explicit param or the rendering scope) into a
/// delivery URL. A descriptor needs `public_id` and `format`; a plain string
/// is taken as a complete asset id. `fetch_format=auto` is forced unless the
/// effective format is `svg`. Remaining hash options become transformations.
fn image_url<'reg, 'rc>(
    builder: &UrlBuilder,
    h: &Helper<'rc>,
    ctx: &'rc Context,
    rc: &mut RenderContext<'reg, 'rc>,
) -> Result<Option<String>, RenderError> {
    let shape = CallShape::of(h);
    let scope = rc.evaluate(ctx, "this")?;
    let Some((asset_id, descriptor_format)) = asset_from_context(shape.value_or_scope(scope.as_json()))
    else {
        return Ok(None);
    };

    let mut options = UrlOptions::default();
    let format_option = hash_str(h, "format");
    let effective_format = format_option.as_deref().or(descriptor_format.as_deref());
    if effective_format != Some("svg") {
        options.transform("fetch_format", "auto");
    }
    for (name, value) in h.hash() {
        if *name == "format" {
            continue;
        }
        options.transform(name, value_to_string(value.value()));
    }
    Ok(Some(builder.build_url(&asset_id, &options)))
}

fn asset_from_context(context: &Value) -> Option<(String, Option<String>)> {
    match context {
        Value::String(s) if !s.is_empty() => Some((s.clone(), None)),
        Value::Object(map) => {
            let public_id = map.get("public_id").and_then(Value::as_str)?;
            let format = map.get("format").and_then(Value::as_str)?;
            Some((format!("{public_id}.{format}"), Some(format.to_string())))
        }
        _ => None,
    }
}

/// `{{cloudinaryUrl image width=200 crop="fill"}}` — the HTTPS delivery URL
/// for an image descriptor, a string asset id, or the current scope.
pub struct CloudinaryUrlHelper {
    builder: UrlBuilder,
}

impl HelperDef for CloudinaryUrlHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let url = image_url(&self.builder, h, ctx, rc)?.unwrap_or_default();
        Ok(ScopedJson::Derived(Value::String(url)))
    }
}

/// Same context resolution as `cloudinaryUrl`, but wraps the URL in a safe
/// `<img>` tag. Unusable context renders nothing.
pub struct CloudinaryImgHelper {
    builder: UrlBuilder,
}

impl HelperDef for CloudinaryImgHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        if let Some(url) = image_url(&self.builder, h, ctx, rc)? {
            out.write(markup::image_tag(&url).as_str())?;
        }
        Ok(())
    }
}

/// `{{cdnAsset product="site" type="js"}}` — a versioned CDN URL for a raw
/// asset, with a fresh random version segment for cache busting.
///
/// `env` defaults to `production`, `fetch` (the resource type) to `raw`.
/// When `path` is given the asset id is `product/path.type`, otherwise
/// `product/env.type`. Missing `product` or `type` renders the empty string.
pub struct CdnAssetHelper {
    builder: UrlBuilder,
}

impl HelperDef for CdnAssetHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let (Some(product), Some(kind)) = (hash_str(h, "product"), hash_str(h, "type")) else {
            return Ok(ScopedJson::Derived(Value::String(String::new())));
        };
        let env = hash_str(h, "env").unwrap_or_else(|| "production".to_string());
        let fetch = hash_str(h, "fetch").unwrap_or_else(|| "raw".to_string());
        let asset_id = match hash_str(h, "path") {
            Some(path) => format!("{product}/{path}.{kind}"),
            None => format!("{product}/{env}.{kind}"),
        };
        let options = UrlOptions {
            resource_type: Some(fetch),
            version: Some(rand::rng().random_range(CACHE_BUST_RANGE)),
            ..UrlOptions::default()
        };
        Ok(ScopedJson::Derived(Value::String(
            self.builder.build_url(&asset_id, &options),
        )))
    }
}

/// Icon names for `application/*` subtypes. Top-level `audio`, `video`, and
/// `image` types classify before this table is consulted.
static APPLICATION_ICONS: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("application/pdf", "pdf"),
        ("application/msword", "word"),
        (
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "word",
        ),
        ("application/vnd.ms-excel", "excel"),
        (
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "excel",
        ),
        ("application/vnd.ms-powerpoint", "powerpoint"),
        (
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            "powerpoint",
        ),
        ("application/zip", "zip"),
        ("application/x-zip-compressed", "zip"),
    ])
});

fn icon_class(mime: Option<&str>) -> String {
    let Some(mime) = mime else {
        return "file".to_string();
    };
    for top_level in ["audio", "video", "image"] {
        if mime
            .strip_prefix(top_level)
            .is_some_and(|rest| rest.starts_with('/'))
        {
            return format!("{top_level}-o");
        }
    }
    match APPLICATION_ICONS.get(mime) {
        Some(icon) => format!("{icon}-o"),
        None => "file".to_string(),
    }
}

/// `{{fileType upload}}` — a short icon-class token for a file descriptor's
/// MIME `filetype`; unknown or missing types fall back to `file`.
#[derive(Clone, Copy)]
pub struct FileTypeHelper;

impl HelperDef for FileTypeHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let mime = h
            .param(0)
            .and_then(|p| p.value().get("filetype"))
            .and_then(Value::as_str);
        Ok(ScopedJson::Derived(Value::String(icon_class(mime))))
    }
}

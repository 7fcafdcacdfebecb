// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Handlebars view helpers for server-rendered sites.
//!
//! The crate exposes a fixed, named set of template helpers — date
//! formatting, Cloudinary media URLs, conditional comparisons, safe markup,
//! and string utilities — registered into a [`handlebars::Handlebars`]
//! engine at startup:
//!
//! ```
//! use hbs_site_helpers::{helper_registry, HelperConfig};
//! use serde_json::json;
//!
//! let reg = helper_registry(&HelperConfig::new("demo")).unwrap();
//! let out = reg
//!     .render_template("{{trim title}}", &json!({"title": "Case Studies"}))
//!     .unwrap();
//! assert_eq!(out, "case-studies");
//! ```
//!
//! Helpers are best-effort by design: missing or malformed values render as
//! empty output (or a generic fallback token) rather than aborting the page
//! render. Every helper is stateless; nothing is retained across
//! invocations, so concurrent renders need no coordination.

mod cloudinary;
mod config;
mod error;
mod helpers;

pub use cloudinary::{UrlBuilder, UrlOptions};
pub use config::HelperConfig;
pub use error::Error;
pub use helpers::markup::RawHtml;

use handlebars::Handlebars;

/// Installs the full helper set into an existing engine under the
/// template-visible names (`date`, `ifeq`, `cloudinaryUrl`, `trim`, ...).
///
/// # Errors
/// Returns [`Error::Url`] when the configured cloud name is unusable.
pub fn register_helpers(reg: &mut Handlebars<'_>, config: &HelperConfig) -> Result<(), Error> {
    helpers::register_all(reg, config)?;
    log::debug!("registered site helpers for cloud {}", config.cloud_name);
    Ok(())
}

/// Builds a fresh engine with every helper installed.
///
/// Strict mode stays off on purpose: a missing value must fall back
/// silently, never abort the render.
///
/// # Errors
/// Returns [`Error::Url`] when the configured cloud name is unusable.
pub fn helper_registry(config: &HelperConfig) -> Result<Handlebars<'static>, Error> {
    let mut reg = Handlebars::new();
    register_helpers(&mut reg, config)?;
    Ok(reg)
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Versioned Cloudinary delivery-URL assembly.
//!
//! This is the URL/asset builder the media helpers delegate to:
//! `build_url(asset_id, options)` produces
//! `https://res.cloudinary.com/<cloud>/<resource_type>/upload/[<transforms>/]v<version>/<asset_id>`.
//! The version segment is an explicit option so callers can substitute a
//! cache-busting value.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::error::Error;

/// Cloudinary encodes transformations with short parameter codes in the URL
/// path. Long option names map through this table; unknown names pass
/// through verbatim.
static SHORT_CODES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("angle", "a"),
        ("background", "b"),
        ("border", "bo"),
        ("crop", "c"),
        ("default_image", "d"),
        ("dpr", "dpr"),
        ("effect", "e"),
        ("fetch_format", "f"),
        ("flags", "fl"),
        ("gravity", "g"),
        ("height", "h"),
        ("opacity", "o"),
        ("quality", "q"),
        ("radius", "r"),
        ("width", "w"),
        ("x", "x"),
        ("y", "y"),
        ("zoom", "z"),
    ])
});

/// Options applied to a single URL build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlOptions {
    /// Cloudinary resource type; `image` when unset.
    pub resource_type: Option<String>,
    /// Version segment; `1` when unset.
    pub version: Option<u64>,
    pub(crate) transforms: BTreeMap<String, String>,
}

impl UrlOptions {
    /// Adds a transformation, translating the long option name to
    /// Cloudinary's short code.
    pub fn transform(&mut self, name: &str, value: impl Into<String>) {
        let code = SHORT_CODES.get(name).copied().unwrap_or(name);
        self.transforms.insert(code.to_string(), value.into());
    }

    fn transform_segment(&self) -> Option<String> {
        if self.transforms.is_empty() {
            return None;
        }
        let joined = self
            .transforms
            .iter()
            .map(|(code, value)| format!("{code}_{value}"))
            .collect::<Vec<_>>()
            .join(",");
        Some(joined)
    }
}

/// Builds delivery URLs for a single Cloudinary cloud. Always HTTPS.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    cloud_name: String,
}

impl UrlBuilder {
    /// Creates a builder for the given cloud.
    ///
    /// # Errors
    /// Returns [`Error::Url`] when the cloud name is empty.
    pub fn new(cloud_name: impl Into<String>) -> Result<Self, Error> {
        let cloud_name = cloud_name.into();
        if cloud_name.is_empty() {
            return Err(Error::url("cloud name must not be empty"));
        }
        Ok(UrlBuilder { cloud_name })
    }

    /// Assembles the delivery URL for an asset id such as `sample.jpg` or
    /// `site/production.js`.
    #[must_use]
    pub fn build_url(&self, asset_id: &str, options: &UrlOptions) -> String {
        let resource_type = options.resource_type.as_deref().unwrap_or("image");
        let version = options.version.unwrap_or(1);
        let mut url = format!(
            "https://res.cloudinary.com/{}/{}/upload/",
            self.cloud_name, resource_type
        );
        if let Some(segment) = options.transform_segment() {
            url.push_str(&segment);
            url.push('/');
        }
        url.push_str(&format!("v{version}/{asset_id}"));
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> UrlBuilder {
        UrlBuilder::new("demo").unwrap()
    }

    #[test]
    fn empty_cloud_name_is_rejected() {
        assert!(UrlBuilder::new("").is_err());
    }

    #[test]
    fn plain_image_url() {
        let url = builder().build_url("sample.jpg", &UrlOptions::default());
        assert_eq!(url, "https://res.cloudinary.com/demo/image/upload/v1/sample.jpg");
    }

    #[test]
    fn transforms_use_short_codes_and_sort() {
        let mut options = UrlOptions::default();
        options.transform("width", "200");
        options.transform("height", "100");
        options.transform("crop", "fill");
        let url = builder().build_url("sample.jpg", &options);
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/c_fill,h_100,w_200/v1/sample.jpg"
        );
    }

    #[test]
    fn unknown_transform_names_pass_through() {
        let mut options = UrlOptions::default();
        options.transform("w", "80");
        let url = builder().build_url("sample.jpg", &options);
        assert!(url.contains("/w_80/"), "{url}");
    }

    #[test]
    fn resource_type_and_version_are_replaceable() {
        let options = UrlOptions {
            resource_type: Some("raw".to_string()),
            version: Some(12345),
            ..UrlOptions::default()
        };
        let url = builder().build_url("site/production.js", &options);
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/raw/upload/v12345/site/production.js"
        );
    }
}

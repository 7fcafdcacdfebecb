// SPDX-License-Identifier: Apache-2.0 OR MIT
use thiserror::Error;

/// Unified error type for registry setup.
///
/// Errors only surface while wiring the helper set up — loading
/// configuration or validating the URL builder. Once registered, helpers are
/// best-effort and render fallback values instead of failing (see the crate
/// docs), so nothing here is produced during template rendering.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or parsed.
    #[error("config error: {message}")]
    Config {
        /// Human-readable description of what was wrong.
        message: String,
    },
    /// The URL builder was given unusable settings.
    #[error("url error: {message}")]
    Url {
        /// Human-readable description of what was wrong.
        message: String,
    },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    pub(crate) fn url(message: impl Into<String>) -> Self {
        Error::Url {
            message: message.into(),
        }
    }
}

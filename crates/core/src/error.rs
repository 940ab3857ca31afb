//! Error types for file conversion.

use crate::types::FormatCategory;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by a format adapter.
///
/// Adapters live in backend crates with their own error enums; the router
/// keeps whatever they return as the `source()` of [`Error::AdapterFailure`].
pub type AdapterError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while routing or running a conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// The source file does not exist.
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source extension is unknown, or the rule table does not allow
    /// converting it to the requested target.
    #[error("Unsupported conversion: '{extension}' to '{target}'")]
    UnsupportedFormatPair { extension: String, target: String },

    /// The adapter selected for the request failed.
    #[error("{route} conversion to {target} failed: {source}")]
    AdapterFailure {
        route: FormatCategory,
        target: String,
        #[source]
        source: AdapterError,
    },

    /// A background conversion ended without reporting a result.
    #[error("Conversion worker stopped before reporting a result")]
    WorkerStopped,
}

impl Error {
    pub(crate) fn unsupported(extension: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnsupportedFormatPair {
            extension: extension.into(),
            target: target.into(),
        }
    }

    /// Whether the request itself was rejected, before any file was touched.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound(_) | Self::UnsupportedFormatPair { .. }
        )
    }
}

//! Unified error types for catalog-diff.
//!
//! Every failure in the load → normalize → compare pipeline is fatal to the
//! single diff it occurs in. The variants carry enough context (path, side,
//! stage) for a caller driving many nodes to attribute the failure without
//! aborting the rest of the batch.

use crate::model::CatalogSide;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for catalog-diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CatalogDiffError {
    /// Input path does not exist. Raised before any parse attempt.
    #[error("Cannot find resources in {path:?} ({side} catalog)")]
    FileNotFound { path: PathBuf, side: CatalogSide },

    /// Extension not recognized, or not valid for the configured schema generation
    #[error("Unsupported catalog format for {path:?}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Content could not be deserialized into a catalog
    #[error("Malformed catalog {path:?}: {message}")]
    MalformedCatalog { path: PathBuf, message: String },

    /// Duplicate identity key within one catalog
    #[error("Normalization failed for {side} catalog: duplicate resource {resource}")]
    Normalization { side: CatalogSide, resource: String },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for catalog-diff operations
pub type Result<T> = std::result::Result<T, CatalogDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl CatalogDiffError {
    /// Create a file-not-found error for one side of a diff
    pub fn file_not_found(path: impl Into<PathBuf>, side: CatalogSide) -> Self {
        Self::FileNotFound {
            path: path.into(),
            side,
        }
    }

    /// Create an unsupported-format error
    pub fn unsupported_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed-catalog error
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedCatalog {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate-resource normalization error
    pub fn duplicate_resource(side: CatalogSide, resource: impl Into<String>) -> Self {
        Self::Normalization {
            side,
            resource: resource.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Name of the pipeline stage this error belongs to.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } | Self::UnsupportedFormat { .. } | Self::Io { .. } => "load",
            Self::MalformedCatalog { .. } => "parse",
            Self::Normalization { .. } => "normalize",
            Self::Config(_) => "config",
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for CatalogDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are prepended to whatever context the error already
/// carries, producing a chain such as `"node web01: loading old catalog: ..."`.
///
/// ```ignore
/// use catalog_diff::error::ErrorContext;
///
/// let report = differ.diff().with_context(|| format!("node {node}"))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<CatalogDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
///
/// Variants whose payload is structural (path, side) keep it untouched and
/// chain the context into their free-text field.
fn add_context_to_error(err: CatalogDiffError, new_ctx: &str) -> CatalogDiffError {
    match err {
        CatalogDiffError::UnsupportedFormat { path, reason } => {
            CatalogDiffError::UnsupportedFormat {
                path,
                reason: chain_context(new_ctx, &reason),
            }
        }
        CatalogDiffError::MalformedCatalog { path, message } => {
            CatalogDiffError::MalformedCatalog {
                path,
                message: chain_context(new_ctx, &message),
            }
        }
        CatalogDiffError::Normalization { side, resource } => CatalogDiffError::Normalization {
            side,
            resource: chain_context(new_ctx, &resource),
        },
        CatalogDiffError::Io {
            path,
            message,
            source,
        } => CatalogDiffError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        CatalogDiffError::Config(msg) => CatalogDiffError::Config(chain_context(new_ctx, &msg)),
        other @ CatalogDiffError::FileNotFound { .. } => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

//! Error types for the extractors.
//!
//! Extraction has exactly two failure modes. A source that cannot be opened or
//! read is reported to the caller as [`ProcError::SourceUnavailable`]. A token
//! that fails numeric coercion produces [`ProcError::FieldUnparseable`] inside
//! the coercion helpers, but every extractor recovers from it locally, so it
//! never escapes a `read_*` or `parse_*` call.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ProcError {
    #[error("source unavailable: {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("field '{field}' unparseable: {token:?}")]
    FieldUnparseable { field: String, token: String },
}

impl ProcError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProcError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// True for [`ProcError::SourceUnavailable`].
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, ProcError::SourceUnavailable { .. })
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, ProcError>;

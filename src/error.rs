//! Error types for the errors-const crate.

use std::path::PathBuf;

/// Errors that can occur while generating error code constants.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to read the catalog or the template from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The catalog is not a JSON object of integer keys to string values
    /// once block comments are removed.
    #[error("failed to parse error catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The template failed to parse or referenced something undefined.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Failed to write the rendered output.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Network error while fetching a remote catalog.
    #[cfg(feature = "download")]
    #[error("download failed: {0}")]
    Download(String),
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

//! Error handling for the tally CLI.
//!
//! Every command returns [`CliError`]. Pipeline errors from `tally-report`
//! pass through untouched, the rest describe what went wrong with the build
//! document, the configuration or the files being written. `main` renders
//! them with miette; the `Diagnostic` impl supplies codes and help texts.

mod diagnostic;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The pipeline rejected the build
    #[error(transparent)]
    Report(#[from] tally_report::Error),

    #[error("Build document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    /// Read, but not a build document
    #[error("{origin} is not a build document: {source}")]
    InvalidDocument {
        /// File path, or `stdin`
        origin: String,
        source: tally_report::Error,
    },

    /// A report or metrics file could not be written
    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Classify a failed read of the build document at `path`.
    pub fn reading(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::DocumentNotFound(path.to_path_buf()),
            _ => Self::Io(err),
        }
    }

    pub fn writing(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A configuration value has the wrong shape
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue {
        /// Dotted path of the offending key
        field: String,
        value: String,
        /// Where to look for the offending value
        hint: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

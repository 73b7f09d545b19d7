//! Platform runtime abstraction.
//!
//! The report pipeline needs very little from its host: the working
//! directory, and a way to look for `package.json` files while deriving the
//! root of a rollup build. Both go through the [`Runtime`] trait so that the
//! pipeline holds no process-global state and tests never touch the disk.

pub mod native;

// Test utilities (available in test builds)
#[cfg(any(test, doctest, feature = "test-utils"))]
pub mod test_utils;

use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The working directory could not be read
    #[error("Failed to get current directory: {0}")]
    Cwd(String),
}

/// Host capabilities used while building a report.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use tally_graph::{NativeRuntime, Runtime};
///
/// let runtime = NativeRuntime::new();
/// let cwd = runtime.get_cwd().unwrap();
/// assert!(runtime.exists(&cwd));
/// assert!(!runtime.exists(Path::new("/definitely/not/here")));
/// ```
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Get the current working directory
    fn get_cwd(&self) -> RuntimeResult<PathBuf>;
}

//! Native runtime backed by `std::fs` and `std::env`.

use std::path::{Path, PathBuf};

use super::{Runtime, RuntimeError, RuntimeResult};

/// Runtime for native builds. Stateless, so it is cheap to create per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    pub fn new() -> Self {
        Self
    }
}

impl Runtime for NativeRuntime {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        std::env::current_dir().map_err(|err| RuntimeError::Cwd(err.to_string()))
    }
}

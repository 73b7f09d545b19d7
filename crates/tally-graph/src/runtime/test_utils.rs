//! In-memory runtime for tests.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::{Runtime, RuntimeResult};

/// Runtime over a virtual file tree.
///
/// Directories exist implicitly as ancestors of the files added.
///
/// ```rust,ignore
/// use std::path::Path;
/// use tally_graph::{Runtime, TestRuntime};
///
/// let runtime = TestRuntime::new("/project").with_file("/project/package.json");
///
/// assert!(runtime.exists(Path::new("/project")));
/// assert!(runtime.exists(Path::new("/project/package.json")));
/// assert!(!runtime.exists(Path::new("/project/src")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TestRuntime {
    cwd: PathBuf,
    files: BTreeSet<PathBuf>,
}

impl TestRuntime {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            files: BTreeSet::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_file(path);
        self
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>) {
        self.files.insert(path.into());
    }
}

impl Runtime for TestRuntime {
    fn exists(&self, path: &Path) -> bool {
        self.files.iter().any(|file| file.starts_with(path))
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}

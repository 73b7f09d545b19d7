//! Per-build context shared by the adapters and the report.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tally_graph::PathContext;

/// Bundlers with a report adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundlerName {
    Esbuild,
    Webpack,
    Rspack,
    Vite,
    Rollup,
}

impl BundlerName {
    pub const ALL: [BundlerName; 5] = [
        BundlerName::Esbuild,
        BundlerName::Webpack,
        BundlerName::Rspack,
        BundlerName::Vite,
        BundlerName::Rollup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BundlerName::Esbuild => "esbuild",
            BundlerName::Webpack => "webpack",
            BundlerName::Rspack => "rspack",
            BundlerName::Vite => "vite",
            BundlerName::Rollup => "rollup",
        }
    }
}

impl fmt::Display for BundlerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BundlerName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BundlerName::ALL
            .into_iter()
            .find(|bundler| bundler.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown bundler: {s}"))
    }
}

/// What an adapter learned about a build before it ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildContext {
    pub bundler: BundlerName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Absolute project root.
    pub cwd: PathBuf,
    /// Absolute output directory.
    pub out_dir: PathBuf,
    /// Options as the bundler received them.
    #[serde(default)]
    pub raw_config: Value,
}

impl BuildContext {
    pub fn new(bundler: BundlerName, cwd: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            bundler,
            version: None,
            cwd: cwd.into(),
            out_dir: out_dir.into(),
            raw_config: Value::Null,
        }
    }

    pub fn with_raw_config(mut self, raw_config: Value) -> Self {
        self.raw_config = raw_config;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn path_context(&self) -> PathContext {
        PathContext::new(&self.cwd, &self.out_dir)
    }

    /// Replace the output directory.
    ///
    /// Returns an advisory message when it differs from the previous one.
    /// Bundlers may legitimately change it between configuration and output,
    /// so this is never an error.
    pub fn set_out_dir(&mut self, out_dir: impl Into<PathBuf>) -> Option<String> {
        let out_dir = out_dir.into();
        if out_dir == self.out_dir {
            return None;
        }

        let advisory = format!(
            "output directory changed from {} to {}",
            self.out_dir.display(),
            out_dir.display()
        );
        self.out_dir = out_dir;
        Some(advisory)
    }
}

//! Bundler statistics, native and canonical.
//!
//! Each bundler describes a build differently: esbuild writes a metafile,
//! webpack and rspack produce stats JSON, rollup and vite hand over an output
//! bundle. The submodules deserialize those native shapes and convert them
//! into [`BuildStats`], the one form the dependency graph is built from.
//!
//! Paths in [`BuildStats`] are still raw. The graph normalizes them, so
//! converters only resolve bundler-relative paths into absolute ones.

pub mod esbuild;
pub mod rollup;
pub mod webpack;

use serde::{Deserialize, Serialize};

use crate::paths::PathContext;
use crate::{Error, Result};

/// A source module that went into the build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModule {
    pub id: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Modules this one imports directly. May name modules outside the build.
    #[serde(default)]
    pub imports: Vec<String>,
}

/// A file the bundler wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOutput {
    pub path: String,
    #[serde(default)]
    pub size: u64,
    /// Modules rendered into this file, or the output a sourcemap maps.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Other outputs this one loads statically.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Entry module when this output is an entry chunk.
    #[serde(default)]
    pub entry_point: Option<String>,
}

/// A named entry and the modules its dependency closure starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    pub name: String,
    #[serde(default)]
    pub main_output: Option<String>,
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// Bundler-independent description of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    #[serde(default)]
    pub modules: Vec<RawModule>,
    #[serde(default)]
    pub outputs: Vec<RawOutput>,
    #[serde(default)]
    pub entries: Vec<EntryPoint>,
}

/// Native statistics, tagged by the bundler that produced them.
///
/// ```rust
/// use serde_json::json;
/// use tally_graph::stats::BundlerStats;
///
/// let stats: BundlerStats = serde_json::from_value(json!({
///     "bundler": "esbuild",
///     "stats": { "metafile": { "inputs": {}, "outputs": {} } }
/// }))
/// .unwrap();
/// assert_eq!(stats.bundler(), "esbuild");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "bundler", content = "stats", rename_all = "lowercase")]
pub enum BundlerStats {
    Esbuild(esbuild::EsbuildStats),
    Webpack(webpack::StatsJson),
    Rspack(webpack::StatsJson),
    Rollup(rollup::RollupStats),
    Vite(rollup::RollupStats),
}

impl BundlerStats {
    /// Parse a `{"bundler": ..., "stats": ...}` document.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|err| Error::InvalidStats(err.to_string()))
    }

    /// Parse the native statistics of `bundler`.
    pub fn from_parts(bundler: &str, stats: serde_json::Value) -> Result<Self> {
        let invalid = |err: serde_json::Error| Error::InvalidStats(format!("{bundler}: {err}"));

        Ok(match bundler {
            "esbuild" => Self::Esbuild(serde_json::from_value(stats).map_err(invalid)?),
            "webpack" => Self::Webpack(serde_json::from_value(stats).map_err(invalid)?),
            "rspack" => Self::Rspack(serde_json::from_value(stats).map_err(invalid)?),
            "rollup" => Self::Rollup(serde_json::from_value(stats).map_err(invalid)?),
            "vite" => Self::Vite(serde_json::from_value(stats).map_err(invalid)?),
            other => return Err(Error::InvalidStats(format!("unknown bundler `{other}`"))),
        })
    }

    pub fn bundler(&self) -> &'static str {
        match self {
            Self::Esbuild(_) => "esbuild",
            Self::Webpack(_) => "webpack",
            Self::Rspack(_) => "rspack",
            Self::Rollup(_) => "rollup",
            Self::Vite(_) => "vite",
        }
    }

    /// Convert to the canonical form. The only place bundlers are told apart.
    pub fn into_build_stats(self, ctx: &PathContext) -> BuildStats {
        match self {
            Self::Esbuild(stats) => stats.to_build_stats(ctx),
            Self::Webpack(stats) | Self::Rspack(stats) => stats.to_build_stats(ctx),
            Self::Rollup(stats) | Self::Vite(stats) => stats.to_build_stats(ctx),
        }
    }
}

/// The output a sourcemap belongs to: `main.js.map` maps `main.js`.
pub(crate) fn sourcemap_target(path: &str) -> Option<&str> {
    path.strip_suffix(".map")
}

//! Bundler report adapters.
//!
//! An adapter reads the options a bundler was configured with and derives
//! the [`BuildContext`] of the build: its project root and its output
//! directory. Every path in the report is later rendered relative to those.

pub mod esbuild;
pub mod rollup;
pub mod vite;
pub mod webpack;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tally_graph::Runtime;

use crate::context::{BuildContext, BundlerName};
use crate::{Error, Result};

pub use esbuild::EsbuildOptions;
pub use rollup::RollupOptions;
pub use vite::ViteConfig;
pub use webpack::WebpackOptions;

/// Derive a [`BuildContext`] from bundler options.
pub trait BundlerAdapter {
    fn bundler(&self) -> BundlerName;

    fn extract(&self, runtime: &dyn Runtime) -> Result<BuildContext>;
}

/// Options of any supported bundler, tagged by bundler name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "bundler", content = "options", rename_all = "lowercase")]
pub enum BundlerOptions {
    Esbuild(EsbuildOptions),
    Webpack(WebpackOptions),
    Rspack(WebpackOptions),
    Vite(ViteConfig),
    Rollup(RollupOptions),
}

impl BundlerOptions {
    /// Parse the options `bundler` was configured with.
    pub fn from_parts(bundler: BundlerName, options: Value) -> Result<Self> {
        let invalid =
            |err: serde_json::Error| Error::InvalidConfig(format!("{bundler} options: {err}"));

        Ok(match bundler {
            BundlerName::Esbuild => {
                Self::Esbuild(serde_json::from_value(options).map_err(invalid)?)
            }
            BundlerName::Webpack => {
                Self::Webpack(serde_json::from_value(options).map_err(invalid)?)
            }
            BundlerName::Rspack => {
                Self::Rspack(serde_json::from_value(options).map_err(invalid)?)
            }
            BundlerName::Vite => {
                Self::Vite(serde_json::from_value(options).map_err(invalid)?)
            }
            BundlerName::Rollup => {
                Self::Rollup(serde_json::from_value(options).map_err(invalid)?)
            }
        })
    }

    fn adapter(&self) -> &dyn BundlerAdapter {
        match self {
            Self::Esbuild(options) => options,
            Self::Webpack(options) => options,
            Self::Rspack(options) => options,
            Self::Vite(options) => options,
            Self::Rollup(options) => options,
        }
    }
}

impl BundlerAdapter for BundlerOptions {
    fn bundler(&self) -> BundlerName {
        match self {
            // webpack and rspack share one adapter; the tag tells them apart.
            Self::Rspack(_) => BundlerName::Rspack,
            other => other.adapter().bundler(),
        }
    }

    fn extract(&self, runtime: &dyn Runtime) -> Result<BuildContext> {
        let mut context = self.adapter().extract(runtime)?;
        context.bundler = self.bundler();

        tracing::debug!(
            bundler = %context.bundler,
            cwd = %context.cwd.display(),
            out_dir = %context.out_dir.display(),
            "extracted build context"
        );
        Ok(context)
    }
}

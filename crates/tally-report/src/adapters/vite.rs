//! vite adapter.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tally_graph::{Runtime, absolute_path, nearest_common_dir};

use super::BundlerAdapter;
use super::rollup::out_dirs_from_outputs;
use crate::Result;
use crate::context::{BuildContext, BundlerName};

const DEFAULT_OUT_DIR: &str = "dist";

/// The resolved vite config, as handed to `configResolved`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub build: ViteBuild,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViteBuild {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollup_options: Option<ViteRollupOptions>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViteRollupOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl ViteConfig {
    /// Output directory: rollup output options win over `build.outDir`.
    fn out_dir(&self, cwd: &Path) -> PathBuf {
        let output = self
            .build
            .rollup_options
            .as_ref()
            .and_then(|options| options.output.as_ref());
        let dirs: Vec<PathBuf> = out_dirs_from_outputs(output)
            .into_iter()
            .filter(|dir| !dir.is_empty())
            .map(|dir| absolute_path(cwd, Path::new(&dir)))
            .collect();

        if !dirs.is_empty() {
            return nearest_common_dir(&dirs, cwd);
        }

        let out_dir = self
            .build
            .out_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_OUT_DIR));
        absolute_path(cwd, out_dir)
    }
}

impl BundlerAdapter for ViteConfig {
    fn bundler(&self) -> BundlerName {
        BundlerName::Vite
    }

    fn extract(&self, runtime: &dyn Runtime) -> Result<BuildContext> {
        let process_cwd = runtime.get_cwd()?;
        let cwd = match &self.root {
            Some(root) => absolute_path(&process_cwd, root),
            None => process_cwd,
        };
        let out_dir = self.out_dir(&cwd);

        Ok(BuildContext::new(BundlerName::Vite, cwd, out_dir)
            .with_raw_config(serde_json::to_value(self)?))
    }
}

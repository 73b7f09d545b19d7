//! esbuild adapter.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tally_graph::stats::esbuild::EntryPoints;
use tally_graph::{Runtime, absolute_path};

use super::BundlerAdapter;
use crate::Result;
use crate::context::{BuildContext, BundlerName};

/// esbuild `BuildOptions`, the fields the report reads plus everything else
/// kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsbuildOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abs_working_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfile: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_points: Option<EntryPoints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metafile: Option<bool>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl EsbuildOptions {
    /// Options with the metafile turned on, which the report is built from.
    pub fn with_metafile(&self) -> Self {
        Self {
            metafile: Some(true),
            ..self.clone()
        }
    }

    fn out_dir(&self, cwd: &Path) -> PathBuf {
        if let Some(outdir) = &self.outdir {
            return absolute_path(cwd, outdir);
        }

        let outfile = self.outfile.as_deref().map(|outfile| absolute_path(cwd, outfile));
        match outfile.as_deref().and_then(Path::parent) {
            Some(parent) => parent.to_path_buf(),
            None => {
                tracing::debug!("esbuild writes neither outdir nor outfile, using cwd");
                cwd.to_path_buf()
            }
        }
    }
}

impl BundlerAdapter for EsbuildOptions {
    fn bundler(&self) -> BundlerName {
        BundlerName::Esbuild
    }

    fn extract(&self, runtime: &dyn Runtime) -> Result<BuildContext> {
        let process_cwd = runtime.get_cwd()?;
        let cwd = match &self.abs_working_dir {
            Some(dir) => absolute_path(&process_cwd, dir),
            None => process_cwd,
        };
        let out_dir = self.out_dir(&cwd);

        Ok(BuildContext::new(BundlerName::Esbuild, cwd, out_dir)
            .with_raw_config(serde_json::to_value(self)?))
    }
}

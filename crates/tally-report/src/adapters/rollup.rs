//! rollup adapter.
//!
//! rollup has no notion of a project root. It is derived from where the
//! entry modules live: each entry directory is widened to its highest
//! ancestor holding a `package.json`, then the nearest common directory of
//! those is taken.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tally_graph::{Runtime, absolute_path, nearest_common_dir};

use super::BundlerAdapter;
use crate::context::{BuildContext, BundlerName};
use crate::{Error, Result};

/// rollup `InputOptions` with the `output` options attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupOptions {
    /// A path, a list of paths, or an object of named paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    /// One output options object or a list of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl RollupOptions {
    /// Entry module paths as written in `input`.
    ///
    /// Fails on anything but strings inside the input.
    pub fn entry_files(&self) -> Result<Vec<String>> {
        let invalid = |value: &Value| Error::InvalidInputType(value.to_string());

        let values: Vec<&Value> = match &self.input {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items.iter().collect(),
            Some(Value::Object(named)) => named.values().collect(),
            Some(value) => vec![value],
        };

        values
            .into_iter()
            .map(|value| value.as_str().map(str::to_string).ok_or_else(|| invalid(value)))
            .collect()
    }
}

/// Output directories named by rollup output options, in order.
///
/// `dir` is used as is, `file` contributes its directory.
pub fn out_dirs_from_outputs(output: Option<&Value>) -> Vec<String> {
    let outputs: Vec<&Value> = match output {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(value @ Value::Object(_)) => vec![value],
        _ => Vec::new(),
    };

    outputs
        .into_iter()
        .filter_map(|output| {
            if let Some(dir) = output.get("dir").and_then(Value::as_str) {
                return Some(dir.to_string());
            }
            output.get("file").and_then(Value::as_str).map(parent_dir)
        })
        .collect()
}

/// The first output directory, or an empty string when none is configured.
///
/// ```rust
/// use serde_json::json;
/// use tally_report::adapters::rollup::get_out_dir_from_outputs;
///
/// assert_eq!(get_out_dir_from_outputs(Some(&json!({ "dir": "dist" }))), "dist");
/// assert_eq!(get_out_dir_from_outputs(Some(&json!([{ "file": "out/a.js" }]))), "out");
/// assert_eq!(get_out_dir_from_outputs(None), "");
/// ```
pub fn get_out_dir_from_outputs(output: Option<&Value>) -> String {
    out_dirs_from_outputs(output)
        .into_iter()
        .next()
        .unwrap_or_default()
}

/// Highest directory, from `dir` up to the root, holding a `package.json`.
pub fn highest_package_json_dir(dir: &Path, runtime: &dyn Runtime) -> Option<PathBuf> {
    dir.ancestors()
        .filter(|ancestor| runtime.exists(&ancestor.join("package.json")))
        .last()
        .map(Path::to_path_buf)
}

/// Project root of a rollup build.
///
/// Falls back to the process cwd when the entries share no directory but
/// the filesystem root.
pub fn compute_cwd(options: &RollupOptions, runtime: &dyn Runtime) -> Result<PathBuf> {
    let process_cwd = runtime.get_cwd()?;
    Ok(project_root(options, runtime, &process_cwd)?.unwrap_or(process_cwd))
}

/// Nearest common directory of the entries, each widened to its highest
/// `package.json` ancestor, and of an absolute output directory.
fn project_root(
    options: &RollupOptions,
    runtime: &dyn Runtime,
    process_cwd: &Path,
) -> Result<Option<PathBuf>> {
    let mut candidates: Vec<PathBuf> = options
        .entry_files()?
        .iter()
        .filter_map(|file| {
            absolute_path(process_cwd, Path::new(file))
                .parent()
                .map(Path::to_path_buf)
        })
        .map(|dir| highest_package_json_dir(&dir, runtime).unwrap_or(dir))
        .collect();

    let out_dir = get_out_dir_from_outputs(options.output.as_ref());
    if Path::new(&out_dir).is_absolute() {
        candidates.push(PathBuf::from(out_dir));
    }

    // An empty fallback stands for "nothing shared below the root".
    let common = nearest_common_dir(&candidates, Path::new(""));
    let root = Some(common).filter(|dir| !dir.as_os_str().is_empty());

    match &root {
        Some(cwd) => {
            tracing::debug!(cwd = %cwd.display(), candidates = candidates.len(), "computed rollup cwd");
        }
        None => {
            tracing::debug!(candidates = candidates.len(), "rollup entries share no directory");
        }
    }
    Ok(root)
}

/// Track the output options rollup settled on once bundling started.
///
/// Returns the advisory when the output directory moved.
pub fn apply_output_options(context: &mut BuildContext, output: Option<&Value>) -> Option<String> {
    let out_dir = get_out_dir_from_outputs(output);
    if out_dir.is_empty() {
        return None;
    }

    let advisory = context.set_out_dir(absolute_path(&context.cwd, Path::new(&out_dir)));
    if let Some(message) = &advisory {
        tracing::info!(bundler = %context.bundler, "{message}");
    }
    advisory
}

fn parent_dir(file: &str) -> String {
    Path::new(file)
        .parent()
        .map(|parent| parent.display().to_string())
        .unwrap_or_default()
}

impl BundlerAdapter for RollupOptions {
    fn bundler(&self) -> BundlerName {
        BundlerName::Rollup
    }

    fn extract(&self, runtime: &dyn Runtime) -> Result<BuildContext> {
        let process_cwd = runtime.get_cwd()?;
        let (cwd, out_dir) = match project_root(self, runtime, &process_cwd)? {
            Some(cwd) => {
                let out_dir = match get_out_dir_from_outputs(self.output.as_ref()) {
                    dir if dir.is_empty() => cwd.join("dist"),
                    dir => absolute_path(&process_cwd, Path::new(&dir)),
                };
                (cwd, out_dir)
            }
            None => (process_cwd.clone(), process_cwd),
        };

        Ok(BuildContext::new(BundlerName::Rollup, cwd, out_dir)
            .with_raw_config(serde_json::to_value(self)?))
    }
}

//! webpack and rspack adapter.
//!
//! Both bundlers expose the same normalized `compiler.options`, so one set of
//! types serves them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tally_graph::{Runtime, absolute_path};

use super::BundlerAdapter;
use crate::context::{BuildContext, BundlerName};
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebpackOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<PathBuf>,
    #[serde(default)]
    pub output: WebpackOutput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebpackOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl WebpackOptions {
    /// Options with `file` loaded first by every entry.
    pub fn with_injected_entry(&self, file: &str) -> Self {
        Self {
            entry: self.entry.as_ref().map(|entry| inject_entry(entry, file)),
            ..self.clone()
        }
    }
}

/// Prepend `file` to every entry of a webpack `entry` option.
///
/// Handles a single path, a list of paths, and an object of named entries
/// whose values are paths, lists, or descriptors with an `import` field.
/// Anything else is returned unchanged.
///
/// ```rust
/// use serde_json::json;
/// use tally_report::adapters::webpack::inject_entry;
///
/// assert_eq!(inject_entry(&json!("./src/a.js"), "inj.js"), json!(["inj.js", "./src/a.js"]));
/// assert_eq!(
///     inject_entry(&json!({ "app": { "import": "./src/a.js" } }), "inj.js"),
///     json!({ "app": { "import": ["inj.js", "./src/a.js"] } })
/// );
/// ```
pub fn inject_entry(entry: &Value, file: &str) -> Value {
    match entry {
        Value::Object(named) => Value::Object(
            named
                .iter()
                .map(|(name, value)| (name.clone(), inject_entry_value(value, file)))
                .collect(),
        ),
        other => prepend(other, file).unwrap_or_else(|| other.clone()),
    }
}

fn inject_entry_value(value: &Value, file: &str) -> Value {
    match value {
        Value::Object(descriptor) => {
            let mut descriptor = descriptor.clone();
            if let Some(import) = descriptor.get("import").and_then(|import| prepend(import, file)) {
                descriptor.insert("import".to_string(), import);
            }
            Value::Object(descriptor)
        }
        other => prepend(other, file).unwrap_or_else(|| other.clone()),
    }
}

fn prepend(value: &Value, file: &str) -> Option<Value> {
    let injected = Value::String(file.to_string());
    match value {
        Value::String(_) => Some(Value::Array(vec![injected, value.clone()])),
        Value::Array(items) => Some(Value::Array(
            std::iter::once(injected).chain(items.iter().cloned()).collect(),
        )),
        _ => None,
    }
}

impl BundlerAdapter for WebpackOptions {
    fn bundler(&self) -> BundlerName {
        BundlerName::Webpack
    }

    fn extract(&self, runtime: &dyn Runtime) -> Result<BuildContext> {
        let process_cwd = runtime.get_cwd()?;
        let cwd = match &self.context {
            Some(context) => absolute_path(&process_cwd, context),
            None => process_cwd.clone(),
        };
        let out_dir = self
            .output
            .path
            .as_deref()
            .map(|path| absolute_path(&process_cwd, path))
            .ok_or(Error::MissingOutDir {
                bundler: BundlerName::Webpack,
            })?;

        Ok(BuildContext::new(BundlerName::Webpack, cwd, out_dir)
            .with_raw_config(serde_json::to_value(self)?))
    }
}

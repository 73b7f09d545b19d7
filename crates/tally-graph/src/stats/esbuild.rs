//! esbuild metafile.
//!
//! Paths in a metafile are relative to esbuild's working directory, which is
//! the `cwd` of the [`PathContext`]. Imports marked `external` never appear
//! in `inputs` and are dropped here.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::{BuildStats, EntryPoint, RawModule, RawOutput, sourcemap_target};
use crate::paths::{PathContext, absolute_path, normalize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metafile {
    #[serde(default)]
    pub inputs: IndexMap<String, MetafileInput>,
    #[serde(default)]
    pub outputs: IndexMap<String, MetafileOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafileInput {
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub imports: Vec<MetafileImport>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafileImport {
    pub path: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub external: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafileOutput {
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub inputs: IndexMap<String, OutputInput>,
    #[serde(default)]
    pub imports: Vec<MetafileImport>,
    #[serde(default)]
    pub entry_point: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputInput {
    #[serde(default)]
    pub bytes_in_output: u64,
}

/// The `entryPoints` build option in any of its three shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryPoints {
    /// `["src/a.js", "src/b.js"]`
    List(Vec<String>),
    /// `[{ "in": "src/a.js", "out": "a" }]`
    Pairs(Vec<EntryPair>),
    /// `{ "a": "src/a.js" }`
    Named(IndexMap<String, String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPair {
    #[serde(rename = "in")]
    pub input: String,
    #[serde(rename = "out")]
    pub output: String,
}

/// Everything the esbuild shim reports for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsbuildStats {
    pub metafile: Metafile,
    #[serde(default)]
    pub entry_points: Option<EntryPoints>,
}

/// Map each normalized entry module to its entry name.
///
/// Named entries use their key. Bare lists are named by the normalized path,
/// the same name an entry gets when no `entryPoints` are known at all.
pub fn entry_names(entry_points: &EntryPoints, ctx: &PathContext) -> IndexMap<String, String> {
    let key = |path: &str| normalize(path, ctx);

    match entry_points {
        EntryPoints::List(paths) => paths.iter().map(|path| (key(path), key(path))).collect(),
        EntryPoints::Pairs(pairs) => pairs
            .iter()
            .map(|pair| (key(&pair.input), pair.output.clone()))
            .collect(),
        EntryPoints::Named(named) => named
            .iter()
            .map(|(name, path)| (key(path), name.clone()))
            .collect(),
    }
}

/// Every input reachable from `entry_point` through static imports.
///
/// Imports absent from `metafile.inputs` are external and skipped. The walk
/// is iterative, each input visited once, so import cycles terminate.
pub fn inputs_dependencies(metafile: &Metafile, entry_point: &str) -> IndexSet<String> {
    let mut visited = IndexSet::new();
    let mut stack = vec![entry_point.to_string()];

    while let Some(path) = stack.pop() {
        let Some(input) = metafile.inputs.get(&path) else {
            continue;
        };
        if !visited.insert(path) {
            continue;
        }
        for import in input.imports.iter().rev() {
            if !import.external && !visited.contains(&import.path) {
                stack.push(import.path.clone());
            }
        }
    }

    visited
}

impl EsbuildStats {
    pub fn to_build_stats(&self, ctx: &PathContext) -> BuildStats {
        let names = self
            .entry_points
            .as_ref()
            .map(|entry_points| entry_names(entry_points, ctx))
            .unwrap_or_default();

        let modules = self
            .metafile
            .inputs
            .iter()
            .map(|(path, input)| RawModule {
                id: resolve(ctx, path),
                size: input.bytes,
                imports: input
                    .imports
                    .iter()
                    .filter(|import| !import.external)
                    .map(|import| resolve(ctx, &import.path))
                    .collect(),
            })
            .collect();

        let mut outputs = Vec::with_capacity(self.metafile.outputs.len());
        let mut entries = Vec::new();

        for (path, output) in &self.metafile.outputs {
            let mut inputs: Vec<String> =
                output.inputs.keys().map(|input| resolve(ctx, input)).collect();
            if inputs.is_empty() {
                let target = sourcemap_target(path)
                    .filter(|target| self.metafile.outputs.contains_key(*target));
                if let Some(target) = target {
                    inputs.push(resolve(ctx, target));
                }
            }

            if let Some(entry_point) = &output.entry_point {
                let key = normalize(entry_point, ctx);
                let name = names.get(&key).cloned().unwrap_or(key);
                let mut seeds = inputs.clone();
                seeds.extend(
                    inputs_dependencies(&self.metafile, entry_point)
                        .iter()
                        .map(|input| resolve(ctx, input)),
                );
                entries.push(EntryPoint {
                    name,
                    main_output: Some(resolve(ctx, path)),
                    seeds,
                });
            }

            outputs.push(RawOutput {
                path: resolve(ctx, path),
                size: output.bytes,
                inputs,
                imports: output
                    .imports
                    .iter()
                    .filter(|import| !import.external)
                    .map(|import| resolve(ctx, &import.path))
                    .collect(),
                entry_point: output
                    .entry_point
                    .as_deref()
                    .map(|entry_point| resolve(ctx, entry_point)),
            });
        }

        tracing::debug!(
            modules = self.metafile.inputs.len(),
            outputs = outputs.len(),
            entries = entries.len(),
            "converted esbuild metafile"
        );

        BuildStats {
            modules,
            outputs,
            entries,
        }
    }
}

fn resolve(ctx: &PathContext, path: &str) -> String {
    absolute_path(&ctx.cwd, Path::new(path)).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metafile() -> Metafile {
        serde_json::from_value(json!({
            "inputs": {
                "src/a.js": { "bytes": 10, "imports": [{ "path": "src/shared.js", "kind": "import-statement" }] },
                "src/shared.js": { "bytes": 5, "imports": [
                    { "path": "src/a.js", "kind": "import-statement" },
                    { "path": "react", "kind": "import-statement", "external": true },
                    { "path": "src/missing.js", "kind": "import-statement" }
                ] }
            },
            "outputs": {}
        }))
        .unwrap()
    }

    #[test]
    fn entry_point_shapes_deserialize() {
        let list: EntryPoints = serde_json::from_value(json!(["src/a.js"])).unwrap();
        assert!(matches!(list, EntryPoints::List(_)));

        let pairs: EntryPoints =
            serde_json::from_value(json!([{ "in": "src/a.js", "out": "a" }])).unwrap();
        assert!(matches!(pairs, EntryPoints::Pairs(_)));

        let named: EntryPoints = serde_json::from_value(json!({ "app": "src/a.js" })).unwrap();
        assert!(matches!(named, EntryPoints::Named(_)));
    }

    #[test]
    fn entry_names_use_keys_or_paths() {
        let ctx = PathContext::new("/cwd", "/cwd/dist");

        let named: EntryPoints = serde_json::from_value(json!({ "app": "./src/a.js" })).unwrap();
        let names = entry_names(&named, &ctx);
        assert_eq!(names.get("src/a.js").map(String::as_str), Some("app"));

        let list = EntryPoints::List(vec!["./src/b.js".into(), "/cwd/src/c.js".into()]);
        let names = entry_names(&list, &ctx);
        assert_eq!(names.get("src/b.js").map(String::as_str), Some("src/b.js"));
        assert_eq!(names.get("src/c.js").map(String::as_str), Some("src/c.js"));
    }

    #[test]
    fn bare_list_names_match_unnamed_entries() {
        let ctx = PathContext::new("/cwd", "/cwd/dist");
        let stats = |entry_points: Option<EntryPoints>| EsbuildStats {
            metafile: serde_json::from_value(json!({
                "inputs": { "src/a.js": { "bytes": 10, "imports": [] } },
                "outputs": {
                    "dist/a.js": {
                        "bytes": 12,
                        "entryPoint": "src/a.js",
                        "inputs": { "src/a.js": { "bytesInOutput": 10 } }
                    }
                }
            }))
            .unwrap(),
            entry_points,
        };

        let listed = stats(Some(EntryPoints::List(vec!["/cwd/src/a.js".into()])));
        assert_eq!(listed.to_build_stats(&ctx).entries[0].name, "src/a.js");
        assert_eq!(stats(None).to_build_stats(&ctx).entries[0].name, "src/a.js");
    }

    #[test]
    fn entry_seeds_follow_static_imports_of_the_entry_point() {
        let ctx = PathContext::new("/cwd", "/cwd/dist");
        let mut metafile = metafile();
        metafile.outputs.insert(
            "dist/a.js".into(),
            serde_json::from_value(json!({ "bytes": 15, "entryPoint": "src/a.js" })).unwrap(),
        );
        let stats = EsbuildStats { metafile, entry_points: None };

        let seeds = &stats.to_build_stats(&ctx).entries[0].seeds;
        assert_eq!(seeds, &vec!["/cwd/src/a.js", "/cwd/src/shared.js"]);
    }

    #[test]
    fn dependencies_skip_unknown_and_external_imports() {
        let deps = inputs_dependencies(&metafile(), "src/a.js");
        let deps: Vec<_> = deps.into_iter().collect();
        assert_eq!(deps, vec!["src/a.js", "src/shared.js"]);
    }

    #[test]
    fn dependencies_of_unknown_entry_are_empty() {
        assert!(inputs_dependencies(&metafile(), "src/nope.js").is_empty());
    }
}

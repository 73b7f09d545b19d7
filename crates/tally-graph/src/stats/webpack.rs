//! webpack and rspack stats JSON.
//!
//! Only the fields needed for composition are read: modules (with the
//! sub-modules of concatenated modules), the reasons each module was
//! included, chunk membership, assets and entrypoints.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{BuildStats, EntryPoint, RawModule, RawOutput, sourcemap_target};
use crate::paths::{PathContext, absolute_path};

/// Chunk ids are numbers in production builds and strings in development.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkId {
    Number(u64),
    Name(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsJson {
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub modules: Vec<StatsModule>,
    #[serde(default)]
    pub chunks: Vec<StatsChunk>,
    #[serde(default)]
    pub assets: Vec<StatsAsset>,
    #[serde(default)]
    pub entrypoints: IndexMap<String, StatsEntrypoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsModule {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub chunks: Vec<ChunkId>,
    #[serde(default)]
    pub reasons: Vec<StatsReason>,
    /// Set on concatenated modules: the modules they were built from.
    #[serde(default)]
    pub modules: Vec<StatsModule>,
}

impl StatsModule {
    fn id(&self) -> Option<&str> {
        self.identifier.as_deref().or(self.name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReason {
    #[serde(default)]
    pub module_identifier: Option<String>,
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsChunk {
    pub id: ChunkId,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub auxiliary_files: Vec<String>,
    #[serde(default)]
    pub entry: bool,
    #[serde(default)]
    pub initial: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsAsset {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub chunks: Vec<ChunkId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsEntrypoint {
    #[serde(default)]
    pub chunks: Vec<ChunkId>,
    #[serde(default)]
    pub assets: Vec<AssetRef>,
}

/// webpack 4 lists entrypoint assets by name, webpack 5 as objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetRef {
    Name(String),
    Asset { name: String },
}

impl AssetRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Asset { name } => name,
        }
    }
}

impl StatsJson {
    /// Modules with concatenated modules replaced by their parts.
    ///
    /// Parts without chunk information inherit the chunks of their parent.
    pub fn flat_modules(&self) -> Vec<StatsModule> {
        let mut flat = Vec::with_capacity(self.modules.len());
        let mut stack: Vec<(StatsModule, Vec<ChunkId>)> = self
            .modules
            .iter()
            .rev()
            .map(|module| (module.clone(), Vec::new()))
            .collect();

        while let Some((mut module, inherited)) = stack.pop() {
            if module.chunks.is_empty() {
                module.chunks = inherited;
            }
            if module.modules.is_empty() {
                flat.push(module);
                continue;
            }
            let parts = std::mem::take(&mut module.modules);
            for part in parts.into_iter().rev() {
                stack.push((part, module.chunks.clone()));
            }
        }

        flat
    }

    pub fn to_build_stats(&self, ctx: &PathContext) -> BuildStats {
        let out_dir = self
            .output_path
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| ctx.absolute_out_dir());
        let asset_path = |name: &str| {
            absolute_path(&out_dir, Path::new(name))
                .display()
                .to_string()
        };

        let flat = self.flat_modules();

        // Reasons point from a module to the modules that include it. Invert
        // them to get imports.
        let mut imports: FxHashMap<&str, IndexSet<&str>> = FxHashMap::default();
        for module in &flat {
            let Some(id) = module.id() else { continue };
            for reason in &module.reasons {
                if let Some(issuer) = reason.module_identifier.as_deref() {
                    imports.entry(issuer).or_default().insert(id);
                }
            }
        }

        let mut chunk_modules: FxHashMap<&ChunkId, Vec<&str>> = FxHashMap::default();
        let mut modules = Vec::with_capacity(flat.len());
        for module in &flat {
            let Some(id) = module.id() else {
                tracing::debug!("skipping webpack module without identifier");
                continue;
            };
            for chunk in &module.chunks {
                chunk_modules.entry(chunk).or_default().push(id);
            }
            modules.push(RawModule {
                id: id.to_string(),
                size: module.size,
                imports: imports
                    .get(id)
                    .map(|set| set.iter().map(|import| import.to_string()).collect())
                    .unwrap_or_default(),
            });
        }

        let asset_names: IndexSet<&str> =
            self.assets.iter().map(|asset| asset.name.as_str()).collect();

        let outputs = self
            .assets
            .iter()
            .map(|asset| {
                let inputs = match sourcemap_target(&asset.name) {
                    Some(target) if asset_names.contains(target) => vec![asset_path(target)],
                    _ => asset
                        .chunks
                        .iter()
                        .filter_map(|chunk| chunk_modules.get(chunk))
                        .flatten()
                        .map(|id| id.to_string())
                        .collect::<IndexSet<_>>()
                        .into_iter()
                        .collect(),
                };
                RawOutput {
                    path: asset_path(&asset.name),
                    size: asset.size,
                    inputs,
                    imports: Vec::new(),
                    entry_point: None,
                }
            })
            .collect();

        let chunk_files: FxHashMap<&ChunkId, &StatsChunk> =
            self.chunks.iter().map(|chunk| (&chunk.id, chunk)).collect();

        let entries = self
            .entrypoints
            .iter()
            .map(|(name, entrypoint)| {
                let seeds: IndexSet<String> = entrypoint
                    .chunks
                    .iter()
                    .filter_map(|chunk| chunk_modules.get(chunk))
                    .flatten()
                    .map(|id| id.to_string())
                    .collect();

                let main_output = entrypoint
                    .assets
                    .iter()
                    .map(AssetRef::name)
                    .filter(|asset| sourcemap_target(asset).is_none())
                    .last()
                    .or_else(|| {
                        entrypoint
                            .chunks
                            .iter()
                            .filter_map(|chunk| chunk_files.get(chunk))
                            .flat_map(|chunk| chunk.files.iter())
                            .map(String::as_str)
                            .next_back()
                    })
                    .map(asset_path);

                EntryPoint {
                    name: name.clone(),
                    main_output,
                    seeds: seeds.into_iter().collect(),
                }
            })
            .collect();

        BuildStats {
            modules,
            outputs,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn concatenated_modules_are_flattened() {
        let stats: StatsJson = serde_json::from_value(json!({
            "modules": [{
                "identifier": "/cwd/src/index.js + 2 modules",
                "size": 30,
                "chunks": [0],
                "modules": [
                    { "identifier": "/cwd/src/index.js", "size": 10 },
                    { "identifier": "/cwd/src/a.js", "size": 20, "chunks": [1] }
                ]
            }]
        }))
        .unwrap();

        let flat = stats.flat_modules();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].identifier.as_deref(), Some("/cwd/src/index.js"));
        assert_eq!(flat[0].chunks, vec![ChunkId::Number(0)]);
        assert_eq!(flat[1].chunks, vec![ChunkId::Number(1)]);
    }

    #[test]
    fn entrypoint_assets_accept_both_shapes() {
        let old: StatsEntrypoint =
            serde_json::from_value(json!({ "chunks": ["main"], "assets": ["main.js"] })).unwrap();
        let new: StatsEntrypoint =
            serde_json::from_value(json!({ "chunks": [0], "assets": [{ "name": "main.js", "size": 1 }] }))
                .unwrap();
        assert_eq!(old.assets[0].name(), "main.js");
        assert_eq!(new.assets[0].name(), "main.js");
        assert_eq!(old.chunks[0], ChunkId::Name("main".into()));
    }

    #[test]
    fn reasons_become_imports_and_sourcemaps_point_to_js() {
        let stats: StatsJson = serde_json::from_value(json!({
            "outputPath": "/cwd/dist",
            "modules": [
                { "identifier": "/cwd/src/index.js", "size": 10, "chunks": [0] },
                { "identifier": "/cwd/src/a.js", "size": 20, "chunks": [0],
                  "reasons": [{ "moduleIdentifier": "/cwd/src/index.js" }] }
            ],
            "chunks": [{ "id": 0, "names": ["main"], "files": ["main.js"], "entry": true }],
            "assets": [
                { "name": "main.js", "size": 100, "chunks": [0] },
                { "name": "main.js.map", "size": 300, "chunks": [0] }
            ],
            "entrypoints": { "main": { "chunks": [0], "assets": [{ "name": "main.js" }, { "name": "main.js.map" }] } }
        }))
        .unwrap();

        let ctx = PathContext::new("/cwd", "/cwd/dist");
        let build = stats.to_build_stats(&ctx);

        assert_eq!(build.modules[0].imports, vec!["/cwd/src/a.js".to_string()]);
        assert_eq!(build.outputs[0].inputs.len(), 2);
        assert_eq!(build.outputs[1].inputs, vec!["/cwd/dist/main.js".to_string()]);
        assert_eq!(build.entries[0].name, "main");
        assert_eq!(build.entries[0].main_output.as_deref(), Some("/cwd/dist/main.js"));
        assert_eq!(build.entries[0].seeds.len(), 2);
    }
}

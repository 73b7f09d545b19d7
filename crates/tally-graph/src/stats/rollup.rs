//! rollup and vite output bundles.
//!
//! The shim serializes the `OutputBundle` handed to `writeBundle`, plus the
//! result of `getModuleInfo` for every module id when available. Without
//! module info, entries only contain the modules rendered into their chunks.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::{BuildStats, EntryPoint, RawModule, RawOutput, sourcemap_target};
use crate::paths::{PathContext, absolute_path, normalize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupStats {
    /// Bundle items keyed by file name, relative to the output directory.
    #[serde(default)]
    pub bundle: IndexMap<String, OutputItem>,
    #[serde(default)]
    pub modules: IndexMap<String, ModuleInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputItem {
    Chunk(OutputChunk),
    Asset(OutputAsset),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputChunk {
    pub file_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_entry: bool,
    #[serde(default)]
    pub facade_module_id: Option<String>,
    #[serde(default)]
    pub modules: IndexMap<String, RenderedModule>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub dynamic_imports: Vec<String>,
    #[serde(default)]
    pub code: Option<String>,
    /// Byte size when the shim measured it rather than sending the code.
    #[serde(default)]
    pub size: Option<u64>,
}

impl OutputChunk {
    pub fn byte_size(&self) -> u64 {
        self.size
            .or_else(|| self.code.as_ref().map(|code| code.len() as u64))
            .unwrap_or_else(|| {
                self.modules
                    .values()
                    .map(|module| module.rendered_length)
                    .sum()
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedModule {
    #[serde(default)]
    pub rendered_length: u64,
    #[serde(default)]
    pub original_length: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputAsset {
    pub file_name: String,
    #[serde(default)]
    pub source: Option<AssetSource>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl OutputAsset {
    pub fn byte_size(&self) -> u64 {
        self.size
            .or_else(|| self.source.as_ref().map(AssetSource::len))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetSource {
    Text(String),
    Bytes(Vec<u8>),
}

impl AssetSource {
    pub fn len(&self) -> u64 {
        match self {
            Self::Text(text) => text.len() as u64,
            Self::Bytes(bytes) => bytes.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Subset of rollup's `ModuleInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    #[serde(default)]
    pub imported_ids: Vec<String>,
    #[serde(default)]
    pub dynamically_imported_ids: Vec<String>,
}

impl RollupStats {
    pub fn to_build_stats(&self, ctx: &PathContext) -> BuildStats {
        let out_dir = ctx.absolute_out_dir();
        let file_path =
            |file_name: &str| absolute_path(&out_dir, Path::new(file_name)).display().to_string();

        let mut modules: IndexMap<&str, RawModule> = IndexMap::new();
        let mut outputs = Vec::with_capacity(self.bundle.len());

        for (file_name, item) in &self.bundle {
            match item {
                OutputItem::Chunk(chunk) => {
                    for (id, rendered) in &chunk.modules {
                        modules.insert(
                            id,
                            RawModule {
                                id: id.clone(),
                                size: rendered.rendered_length,
                                imports: self
                                    .modules
                                    .get(id)
                                    .map(|info| info.imported_ids.clone())
                                    .unwrap_or_default(),
                            },
                        );
                    }
                    outputs.push(RawOutput {
                        path: file_path(file_name),
                        size: chunk.byte_size(),
                        inputs: chunk.modules.keys().cloned().collect(),
                        imports: chunk.imports.iter().map(|import| file_path(import)).collect(),
                        entry_point: chunk.facade_module_id.clone().filter(|_| chunk.is_entry),
                    });
                }
                OutputItem::Asset(asset) => {
                    let inputs = sourcemap_target(file_name)
                        .filter(|target| self.bundle.contains_key(*target))
                        .map(|target| vec![file_path(target)])
                        .unwrap_or_default();
                    outputs.push(RawOutput {
                        path: file_path(file_name),
                        size: asset.byte_size(),
                        inputs,
                        imports: Vec::new(),
                        entry_point: None,
                    });
                }
            }
        }

        let entries = self
            .bundle
            .iter()
            .filter_map(|(file_name, item)| match item {
                OutputItem::Chunk(chunk) if chunk.is_entry => Some((file_name, chunk)),
                _ => None,
            })
            .map(|(file_name, chunk)| EntryPoint {
                name: self.entry_name(chunk, ctx),
                main_output: Some(file_path(file_name)),
                seeds: self.static_chunk_modules(file_name).into_iter().collect(),
            })
            .collect();

        BuildStats {
            modules: modules.into_values().collect(),
            outputs,
            entries,
        }
    }

    /// Modules of a chunk and of every chunk it statically imports.
    fn static_chunk_modules(&self, file_name: &str) -> IndexSet<String> {
        let mut seen = IndexSet::new();
        let mut modules = IndexSet::new();
        let mut stack = vec![file_name];

        while let Some(file_name) = stack.pop() {
            if !seen.insert(file_name) {
                continue;
            }
            let Some(OutputItem::Chunk(chunk)) = self.bundle.get(file_name) else {
                continue;
            };
            modules.extend(chunk.modules.keys().cloned());
            stack.extend(chunk.imports.iter().map(String::as_str));
        }

        modules
    }

    fn entry_name(&self, chunk: &OutputChunk, ctx: &PathContext) -> String {
        chunk
            .name
            .clone()
            .or_else(|| {
                chunk
                    .facade_module_id
                    .as_deref()
                    .map(|facade| normalize(facade, ctx))
            })
            .unwrap_or_else(|| chunk.file_name.clone())
    }
}

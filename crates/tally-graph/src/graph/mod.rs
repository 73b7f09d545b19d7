//! Dependency graph reconciled from [`BuildStats`].
//!
//! Modules and outputs are keyed by their normalized identity. Entries are
//! resolved in two passes: first the modules each entry reaches, then the
//! outputs that carry any of those modules. The second pass needs the first
//! to be complete, so both run inside [`DependencyGraph::build`].

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::paths::{
    PathContext, absolute_path, clean_path, get_type, is_injection_file, normalize,
};
use crate::stats::BuildStats;

/// A module in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleNode {
    pub id: String,
    /// Absolute path on disk, decorations removed.
    pub path: PathBuf,
    pub size: u64,
    /// Type from the raw path, so runtime modules keep their `runtime` type.
    pub kind: String,
    /// Distinct modules imported directly. Only modules of this build.
    pub imports: IndexSet<String>,
}

/// An emitted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputNode {
    pub id: String,
    pub path: PathBuf,
    pub size: u64,
    pub kind: String,
    /// Modules or outputs this file was produced from, in bundler order.
    pub inputs: IndexSet<String>,
    pub imports: IndexSet<String>,
}

/// An entry with its resolved dependency sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryNode {
    pub name: String,
    pub main_output: Option<String>,
    /// Modules reachable from the entry.
    pub inputs: IndexSet<String>,
    /// Outputs carrying at least one of those modules.
    pub outputs: IndexSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    modules: IndexMap<String, ModuleNode>,
    outputs: IndexMap<String, OutputNode>,
    entries: IndexMap<String, EntryNode>,
    dependents: FxHashMap<String, IndexSet<String>>,
    entry_tags: FxHashMap<String, IndexSet<String>>,
}

impl DependencyGraph {
    /// Build the graph. Deterministic: the same stats give the same graph,
    /// iteration order included.
    pub fn build(stats: &BuildStats, ctx: &PathContext) -> Self {
        let mut graph = Self::default();

        for module in &stats.modules {
            let id = normalize(&module.id, ctx);
            let node = ModuleNode {
                path: filepath(&module.id, ctx),
                size: module.size,
                kind: get_type(&module.id),
                imports: module
                    .imports
                    .iter()
                    .map(|import| normalize(import, ctx))
                    .collect(),
                id: id.clone(),
            };
            graph.modules.insert(id, node);
        }

        for output in &stats.outputs {
            let id = normalize(&output.path, ctx);
            let node = OutputNode {
                path: filepath(&output.path, ctx),
                size: output.size,
                kind: get_type(&output.path),
                inputs: output
                    .inputs
                    .iter()
                    .map(|input| normalize(input, ctx))
                    .collect(),
                imports: output
                    .imports
                    .iter()
                    .map(|import| normalize(import, ctx))
                    .collect(),
                id: id.clone(),
            };
            graph.outputs.insert(id, node);
        }

        graph.prune_unknown_edges();
        graph.index_dependents();

        // First pass: modules reachable from each entry.
        for entry in &stats.entries {
            let seeds: Vec<String> = entry
                .seeds
                .iter()
                .map(|seed| normalize(seed, ctx))
                .filter(|seed| graph.modules.contains_key(seed))
                .collect();
            let inputs = graph.closure(seeds);
            let main_output = entry
                .main_output
                .as_deref()
                .map(|output| normalize(output, ctx));

            graph.entries.insert(
                entry.name.clone(),
                EntryNode {
                    name: entry.name.clone(),
                    main_output,
                    inputs,
                    outputs: IndexSet::new(),
                },
            );
        }

        // Second pass: outputs carrying those modules.
        let resolved: Vec<(String, IndexSet<String>)> = graph
            .entries
            .values()
            .map(|entry| (entry.name.clone(), graph.outputs_for(entry)))
            .collect();
        for (name, outputs) in resolved {
            if let Some(entry) = graph.entries.get_mut(&name) {
                entry.outputs = outputs;
            }
        }

        for entry in graph.entries.values() {
            for module in &entry.inputs {
                graph
                    .entry_tags
                    .entry(module.clone())
                    .or_default()
                    .insert(entry.name.clone());
            }
        }

        tracing::debug!(
            modules = graph.modules.len(),
            outputs = graph.outputs.len(),
            entries = graph.entries.len(),
            "built dependency graph"
        );

        graph
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.modules.values()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &OutputNode> {
        self.outputs.values()
    }

    pub fn entries(&self) -> impl Iterator<Item = &EntryNode> {
        self.entries.values()
    }

    pub fn module(&self, id: &str) -> Option<&ModuleNode> {
        self.modules.get(id)
    }

    pub fn output(&self, id: &str) -> Option<&OutputNode> {
        self.outputs.get(id)
    }

    pub fn entry(&self, name: &str) -> Option<&EntryNode> {
        self.entries.get(name)
    }

    /// Names of the entries whose inputs contain `module`.
    pub fn entry_tags(&self, module: &str) -> impl Iterator<Item = &str> {
        self.entry_tags
            .get(module)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Modules `module` imports directly.
    pub fn dependencies(&self, module: &str) -> impl Iterator<Item = &str> {
        self.modules
            .get(module)
            .into_iter()
            .flat_map(|node| node.imports.iter())
            .map(String::as_str)
    }

    /// Modules importing `module` directly.
    pub fn dependents(&self, module: &str) -> impl Iterator<Item = &str> {
        self.dependents
            .get(module)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn entry_inputs(&self, name: &str) -> Option<&IndexSet<String>> {
        self.entries.get(name).map(|entry| &entry.inputs)
    }

    pub fn entry_outputs(&self, name: &str) -> Option<&IndexSet<String>> {
        self.entries.get(name).map(|entry| &entry.outputs)
    }

    fn prune_unknown_edges(&mut self) {
        let known: IndexSet<String> = self.modules.keys().cloned().collect();
        for node in self.modules.values_mut() {
            node.imports
                .retain(|import| known.contains(import) && import != &node.id);
        }

        let outputs: IndexSet<String> = self.outputs.keys().cloned().collect();
        for node in self.outputs.values_mut() {
            node.inputs
                .retain(|input| known.contains(input) || outputs.contains(input));
            node.imports.retain(|import| outputs.contains(import));
        }
    }

    fn index_dependents(&mut self) {
        for node in self.modules.values() {
            for import in &node.imports {
                self.dependents
                    .entry(import.clone())
                    .or_default()
                    .insert(node.id.clone());
            }
        }
    }

    fn closure(&self, seeds: Vec<String>) -> IndexSet<String> {
        let mut visited = IndexSet::new();
        let mut stack = seeds;
        stack.reverse();

        while let Some(id) = stack.pop() {
            let Some(node) = self.modules.get(&id) else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }
            for import in node.imports.iter().rev() {
                if !visited.contains(import) {
                    stack.push(import.clone());
                }
            }
        }

        visited
    }

    fn outputs_for(&self, entry: &EntryNode) -> IndexSet<String> {
        let mut outputs: IndexSet<String> = self
            .outputs
            .values()
            .filter(|output| {
                entry.main_output.as_deref() == Some(output.id.as_str())
                    || output.inputs.iter().any(|input| entry.inputs.contains(input))
            })
            .map(|output| output.id.clone())
            .collect();

        // Outputs derived from member outputs, sourcemaps mostly.
        loop {
            let derived: Vec<String> = self
                .outputs
                .values()
                .filter(|output| !outputs.contains(&output.id))
                .filter(|output| output.inputs.iter().any(|input| outputs.contains(input)))
                .map(|output| output.id.clone())
                .collect();
            if derived.is_empty() {
                break;
            }
            outputs.extend(derived);
        }

        outputs
    }
}

fn filepath(raw: &str, ctx: &PathContext) -> PathBuf {
    if is_injection_file(raw) {
        return PathBuf::from(raw);
    }
    absolute_path(&ctx.cwd, Path::new(&clean_path(raw)))
}

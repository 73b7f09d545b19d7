//! Turn a [`DependencyGraph`] into report records.

use tally_graph::{DependencyGraph, is_injection_file};

use super::{BuildReport, Entry, Input, Output};
use crate::context::BuildContext;

/// Helpers bundlers inject into every build. They say nothing about the
/// project's own dependency structure.
const BUNDLER_HELPERS: [&str; 2] = ["commonjsHelpers.js", "vite/preload-helper.js"];

/// Whether `name` belongs in dependency and dependent lists.
fn is_tracked_dependency(name: &str) -> bool {
    name != "unknown"
        && !is_injection_file(name)
        && !BUNDLER_HELPERS.iter().any(|helper| name.ends_with(helper))
}

/// Build the report of one build. Deterministic, order included.
pub fn build_report(graph: &DependencyGraph, context: &BuildContext) -> BuildReport {
    let inputs = graph
        .modules()
        .map(|module| Input {
            name: module.id.clone(),
            filepath: module.path.display().to_string(),
            size: module.size,
            kind: module.kind.clone(),
            dependencies: graph
                .dependencies(&module.id)
                .filter(|name| is_tracked_dependency(name))
                .map(str::to_string)
                .collect(),
            dependents: graph
                .dependents(&module.id)
                .filter(|name| is_tracked_dependency(name))
                .map(str::to_string)
                .collect(),
        })
        .collect();

    let outputs = graph
        .outputs()
        .map(|output| Output {
            name: output.id.clone(),
            filepath: output.path.display().to_string(),
            size: output.size,
            kind: output.kind.clone(),
            inputs: output.inputs.iter().cloned().collect(),
        })
        .collect();

    let entries = graph
        .entries()
        .map(|entry| {
            let main = entry
                .main_output
                .as_deref()
                .and_then(|output| graph.output(output));
            Entry {
                name: entry.name.clone(),
                filepath: main
                    .map(|output| output.path.display().to_string())
                    .unwrap_or_default(),
                size: main.map(|output| output.size).unwrap_or_default(),
                kind: main
                    .map(|output| output.kind.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
                inputs: entry.inputs.iter().cloned().collect(),
                outputs: entry.outputs.iter().cloned().collect(),
            }
        })
        .collect();

    BuildReport {
        bundler: context.bundler,
        version: context.version.clone(),
        cwd: context.cwd.display().to_string(),
        out_dir: context.out_dir.display().to_string(),
        inputs,
        outputs,
        entries,
        warnings: Vec::new(),
        errors: Vec::new(),
        duration_ms: None,
    }
}

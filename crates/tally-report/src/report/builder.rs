//! Incremental report assembly.
//!
//! Bundlers report a build through several callbacks, and some of them
//! (webpack in watch mode, rollup with several outputs) report the same
//! module or output more than once. The builder merges everything by
//! normalized identity, last write wins, and builds the graph at the end.

use indexmap::IndexMap;
use tally_graph::stats::{BuildStats, EntryPoint, RawModule, RawOutput};
use tally_graph::{DependencyGraph, PathContext, normalize};

use super::{BuildReport, build_report};
use crate::context::BuildContext;

#[derive(Debug, Clone)]
pub struct ReportBuilder {
    context: BuildContext,
    paths: PathContext,
    modules: IndexMap<String, RawModule>,
    outputs: IndexMap<String, RawOutput>,
    entries: IndexMap<String, EntryPoint>,
    warnings: Vec<String>,
    errors: Vec<String>,
    duration_ms: Option<u64>,
}

impl ReportBuilder {
    pub fn new(context: BuildContext) -> Self {
        let paths = context.path_context();
        Self {
            context,
            paths,
            modules: IndexMap::new(),
            outputs: IndexMap::new(),
            entries: IndexMap::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            duration_ms: None,
        }
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Merge converted statistics into the report.
    pub fn stats(mut self, stats: BuildStats) -> Self {
        self.add_stats(stats);
        self
    }

    pub fn add_stats(&mut self, stats: BuildStats) {
        for module in stats.modules {
            self.modules.insert(normalize(&module.id, &self.paths), module);
        }
        for output in stats.outputs {
            self.outputs.insert(normalize(&output.path, &self.paths), output);
        }
        for entry in stats.entries {
            self.entries.insert(entry.name.clone(), entry);
        }
    }

    pub fn warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn errors(mut self, errors: impl IntoIterator<Item = String>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn duration_ms(mut self, duration_ms: Option<u64>) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Build the graph from everything merged so far and aggregate it.
    pub fn build(self) -> BuildReport {
        let stats = BuildStats {
            modules: self.modules.into_values().collect(),
            outputs: self.outputs.into_values().collect(),
            entries: self.entries.into_values().collect(),
        };
        let graph = DependencyGraph::build(&stats, &self.paths);

        let mut report = build_report(&graph, &self.context);
        report.warnings = self.warnings;
        report.errors = self.errors;
        report.duration_ms = self.duration_ms;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BundlerName;

    #[test]
    fn repeated_modules_merge_last_write_wins() {
        let context = BuildContext::new(BundlerName::Webpack, "/cwd", "/cwd/dist");
        let first = BuildStats {
            modules: vec![
                RawModule { id: "/cwd/src/a.js".into(), size: 1, imports: vec![] },
                RawModule { id: "/cwd/src/b.js".into(), size: 2, imports: vec![] },
            ],
            ..Default::default()
        };
        let second = BuildStats {
            modules: vec![RawModule {
                id: "loader!/cwd/src/a.js?hot".into(),
                size: 10,
                imports: vec![],
            }],
            ..Default::default()
        };

        let report = ReportBuilder::new(context)
            .stats(first)
            .stats(second)
            .warning("careful")
            .build();

        let names: Vec<_> = report.inputs.iter().map(|i| (i.name.as_str(), i.size)).collect();
        assert_eq!(names, vec![("src/a.js", 10), ("src/b.js", 2)]);
        assert_eq!(report.warnings, vec!["careful".to_string()]);
    }
}

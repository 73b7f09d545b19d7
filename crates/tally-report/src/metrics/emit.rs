//! Universal metrics: the ones every bundler can produce.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;

use super::{Metric, MetricType};
use crate::report::BuildReport;

/// Flatten a report into metrics.
///
/// Build-wide counts first, then per input, per output and per entry, each
/// group in report order.
pub fn universal_metrics(report: &BuildReport) -> Vec<Metric> {
    let mut metrics = vec![
        Metric::count("assets.count", report.outputs.len()),
        Metric::count("entries.count", report.entries.len()),
        Metric::count("errors.count", report.errors.len()),
        Metric::count("modules.count", report.inputs.len()),
        Metric::count("warnings.count", report.warnings.len()),
    ];
    if let Some(duration) = report.duration_ms {
        metrics.push(Metric::new(
            "compilation.duration",
            MetricType::Duration,
            duration,
        ));
    }

    // input name -> entries containing it
    let mut entry_tags: FxHashMap<&str, IndexSet<&str>> = FxHashMap::default();
    for entry in &report.entries {
        for input in &entry.inputs {
            entry_tags
                .entry(input.as_str())
                .or_default()
                .insert(entry.name.as_str());
        }
    }

    for input in &report.inputs {
        let tags: Vec<String> = [
            format!("moduleName:{}", input.name),
            format!("moduleType:{}", input.kind),
        ]
        .into_iter()
        .chain(entry_name_tags(
            entry_tags.get(input.name.as_str()).into_iter().flatten().copied(),
        ))
        .collect();

        metrics.push(Metric::size("modules.size", input.size).tags(tags.clone()));
        metrics.push(
            Metric::count("modules.dependencies", input.dependencies.len()).tags(tags.clone()),
        );
        metrics.push(Metric::count("modules.dependents", input.dependents.len()).tags(tags));
    }

    for output in &report.outputs {
        let inputs = report.output_inputs(&output.name);
        let entries: IndexSet<&str> = inputs
            .iter()
            .filter_map(|input| entry_tags.get(input))
            .flatten()
            .copied()
            .collect();

        let tags: Vec<String> = [
            format!("assetName:{}", output.name),
            format!("assetType:{}", output.kind),
        ]
        .into_iter()
        .chain(entry_name_tags(entries))
        .collect();

        metrics.push(Metric::size("assets.size", output.size).tags(tags.clone()));
        metrics.push(Metric::count("assets.modules.count", inputs.len()).tags(tags));
    }

    for entry in &report.entries {
        let tag = format!("entryName:{}", entry.name);
        metrics.push(Metric::size("entries.size", entry.size).tags([tag.clone()]));
        metrics.push(
            Metric::count("entries.modules.count", entry.inputs.len()).tags([tag.clone()]),
        );
        metrics.push(Metric::count("entries.assets.count", entry.outputs.len()).tags([tag]));
    }

    metrics
}

fn entry_name_tags<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| format!("entryName:{name}"))
        .collect()
}

//! Default metric filters.
//!
//! A filter returns `true` to keep a metric. The defaults keep the volume
//! sent per build small: they drop per-file noise (sourcemaps, third-party
//! modules) and anything under a per-metric threshold.

use std::sync::LazyLock;

use regex::Regex;

use super::{Metric, MetricType};

pub type MetricFilter = fn(&Metric) -> bool;

const SIZE_THRESHOLD: u64 = 100_000;
const COUNT_THRESHOLD: u64 = 10;
const DURATION_THRESHOLD: u64 = 1_000;

/// Per-metric threshold overrides, checked in order. Later matches win.
static THRESHOLD_OVERRIDES: LazyLock<Vec<(Regex, MetricType, u64)>> = LazyLock::new(|| {
    [
        (r"(entries|loaders|warnings|errors)\.count$", MetricType::Count, 0),
        (r"modules\.(dependencies|dependents)$", MetricType::Count, 30),
        (r"modules\.tree\.count$", MetricType::Count, 150),
        (r"modules\.tree\.size$", MetricType::Size, 1_500_000),
        (r"entries\.size$", MetricType::Size, 0),
        (r"entries\.modules\.count$", MetricType::Count, 0),
    ]
    .into_iter()
    .filter_map(|(pattern, kind, threshold)| {
        Regex::new(pattern).ok().map(|regex| (regex, kind, threshold))
    })
    .collect()
});

static TREE_METRIC: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^modules\.tree\.").ok());

pub fn default_filters() -> Vec<MetricFilter> {
    vec![
        filter_tree_metrics,
        filter_source_maps,
        filter_third_party_modules,
        filter_by_threshold,
    ]
}

/// Drop dependency tree metrics.
pub fn filter_tree_metrics(metric: &Metric) -> bool {
    TREE_METRIC
        .as_ref()
        .is_none_or(|tree| !tree.is_match(&metric.metric))
}

/// Drop metrics about sourcemap assets.
pub fn filter_source_maps(metric: &Metric) -> bool {
    !metric
        .tag_value("assetName")
        .is_some_and(|asset| asset.ends_with(".map"))
}

/// Drop metrics about modules from `node_modules`.
pub fn filter_third_party_modules(metric: &Metric) -> bool {
    !metric
        .tag_value("moduleName")
        .is_some_and(|module| module.starts_with("/node_modules") || module.contains("/node_modules/"))
}

/// Keep metrics whose value exceeds the threshold for their name and type.
pub fn filter_by_threshold(metric: &Metric) -> bool {
    metric.value > threshold(metric)
}

pub fn threshold(metric: &Metric) -> u64 {
    let default = match metric.kind {
        MetricType::Size => SIZE_THRESHOLD,
        MetricType::Count => COUNT_THRESHOLD,
        MetricType::Duration => DURATION_THRESHOLD,
    };

    THRESHOLD_OVERRIDES
        .iter()
        .filter(|(regex, kind, _)| *kind == metric.kind && regex.is_match(&metric.metric))
        .map(|(_, _, threshold)| *threshold)
        .last()
        .unwrap_or(default)
}

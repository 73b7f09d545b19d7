//! Telemetry metrics derived from a [`BuildReport`](crate::report::BuildReport).

pub mod emit;
pub mod filters;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use emit::universal_metrics;
pub use filters::{MetricFilter, default_filters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Count,
    Size,
    Duration,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetricType::Count => "count",
            MetricType::Size => "size",
            MetricType::Duration => "duration",
        })
    }
}

/// One tagged measurement. Tags are `key:value` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub metric: String,
    #[serde(rename = "type")]
    pub kind: MetricType,
    pub value: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Seconds since the epoch, set when finalized with a timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

impl Metric {
    pub fn new(metric: impl Into<String>, kind: MetricType, value: u64) -> Self {
        Self {
            metric: metric.into(),
            kind,
            value,
            tags: Vec::new(),
            timestamp: None,
        }
    }

    pub fn count(metric: impl Into<String>, value: usize) -> Self {
        Self::new(metric, MetricType::Count, value as u64)
    }

    pub fn size(metric: impl Into<String>, value: u64) -> Self {
        Self::new(metric, MetricType::Size, value)
    }

    pub fn tag(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.tags.push(format!("{key}:{value}"));
        self
    }

    pub fn tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Value of the first tag named `key`.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags.iter().find_map(|tag| {
            tag.strip_prefix(key)
                .and_then(|rest| rest.strip_prefix(':'))
        })
    }
}

/// How metrics are post-processed before they leave the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TelemetryOptions {
    pub enabled: bool,
    /// Prepended to every metric name, joined with a dot.
    pub prefix: Option<String>,
    /// Appended to every metric.
    pub tags: Vec<String>,
    pub default_filters: bool,
    pub timestamp: Option<u64>,
}

impl Default for TelemetryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: None,
            tags: Vec::new(),
            default_filters: true,
            timestamp: None,
        }
    }
}

/// Filter, prefix, tag and sort metrics for sending.
pub fn finalize(metrics: Vec<Metric>, options: &TelemetryOptions) -> Vec<Metric> {
    if !options.enabled {
        return Vec::new();
    }

    let filters = if options.default_filters {
        default_filters()
    } else {
        Vec::new()
    };
    let prefix = options
        .prefix
        .as_deref()
        .map(|prefix| prefix.trim_end_matches('.'))
        .filter(|prefix| !prefix.is_empty());

    let mut metrics: Vec<Metric> = metrics
        .into_iter()
        .filter(|metric| filters.iter().all(|keep| keep(metric)))
        .map(|mut metric| {
            if let Some(prefix) = prefix {
                metric.metric = format!("{prefix}.{}", metric.metric);
            }
            metric.tags.extend(options.tags.iter().cloned());
            metric.timestamp = options.timestamp;
            metric
        })
        .collect();

    metrics.sort_by(|a, b| (&a.metric, &a.tags).cmp(&(&b.metric, &b.tags)));
    metrics
}

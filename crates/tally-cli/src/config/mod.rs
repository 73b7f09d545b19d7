//! Configuration for the tally CLI with multi-source loading.
//!
//! Merges settings from CLI flags, environment variables and config files.
//! Priority: CLI > Environment > File > Defaults

mod defaults;
mod loading;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tally_report::{LogLevel, TelemetryOptions};

pub use defaults::*;
pub use loading::env_key;

/// Tally configuration - loaded from tally.config.json, `TALLY_*` and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TallyConfig {
    /// Metric post-processing (prefix, default tags, filters)
    pub telemetry: TelemetryOptions,

    /// Where reports and metrics are written
    pub output: OutputConfig,

    /// Log level when neither `--verbose`, `--quiet` nor `RUST_LOG` is given
    pub log_level: LogLevel,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            telemetry: TelemetryOptions::default(),
            output: OutputConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Output destinations. Unset paths mean stdout (report) or nowhere (metrics).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PathBuf>,
}

/// Settings given on the command line. Only what was actually passed is
/// serialized, so unset flags never shadow the file or the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "TelemetryOverrides::is_empty")]
    pub telemetry: TelemetryOverrides,
    #[serde(skip_serializing_if = "OutputOverrides::is_empty")]
    pub output: OutputOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Appended to the configured tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_filters: Option<bool>,
}

impl TelemetryOverrides {
    fn is_empty(&self) -> bool {
        self.prefix.is_none() && self.tags.is_empty() && self.default_filters.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PathBuf>,
}

impl OutputOverrides {
    fn is_empty(&self) -> bool {
        self.report.is_none() && self.metrics.is_none()
    }
}

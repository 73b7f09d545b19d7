//! End-to-end processing of one build.
//!
//! adapter → graph → report → metrics. A report is a by-product of the host
//! build, so [`process_build`] never fails: errors turn into an empty report
//! carrying the error message.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tally_graph::Runtime;
use tally_graph::stats::BundlerStats;

use crate::Result;
use crate::adapters::{BundlerAdapter, BundlerOptions, rollup};
use crate::context::BundlerName;
use crate::metrics::{Metric, TelemetryOptions, finalize, universal_metrics};
use crate::report::{BuildReport, ReportBuilder};

/// The document bundler shims hand over at the end of a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInput {
    pub bundler: BundlerName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Options the bundler was configured with.
    #[serde(default)]
    pub options: Value,
    /// Native statistics: metafile, stats JSON or output bundle.
    pub stats: Value,
    /// rollup and vite: output options in effect while writing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_options: Option<Value>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl BuildInput {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutcome {
    pub report: BuildReport,
    pub metrics: Vec<Metric>,
    /// Why the report is empty, when it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Process a build, swallowing errors.
pub fn process_build(
    input: BuildInput,
    telemetry: &TelemetryOptions,
    runtime: &dyn Runtime,
) -> BuildOutcome {
    let bundler = input.bundler;

    match try_process_build(input, telemetry, runtime) {
        Ok((report, metrics)) => BuildOutcome {
            report,
            metrics,
            error: None,
        },
        Err(err) => {
            tracing::warn!(%bundler, "could not build report: {err}");
            let mut report = BuildReport::empty(bundler);
            report.errors.push(err.to_string());
            BuildOutcome {
                report,
                metrics: Vec::new(),
                error: Some(err.to_string()),
            }
        }
    }
}

/// Process a build, surfacing the first error.
pub fn try_process_build(
    input: BuildInput,
    telemetry: &TelemetryOptions,
    runtime: &dyn Runtime,
) -> Result<(BuildReport, Vec<Metric>)> {
    let report = build_report_from_input(input, runtime)?;
    let metrics = finalize(universal_metrics(&report), telemetry);

    tracing::debug!(
        bundler = %report.bundler,
        inputs = report.inputs.len(),
        outputs = report.outputs.len(),
        entries = report.entries.len(),
        metrics = metrics.len(),
        "processed build"
    );
    Ok((report, metrics))
}

/// Adapter, stats conversion and aggregation, without metrics.
pub fn build_report_from_input(input: BuildInput, runtime: &dyn Runtime) -> Result<BuildReport> {
    let options = BundlerOptions::from_parts(input.bundler, input.options)?;
    let mut context = options.extract(runtime)?;
    if let Some(version) = input.version {
        context = context.with_version(version);
    }

    let mut warnings = Vec::new();
    if matches!(input.bundler, BundlerName::Rollup | BundlerName::Vite) {
        warnings.extend(rollup::apply_output_options(
            &mut context,
            input.output_options.as_ref(),
        ));
    }

    let mut stats = BundlerStats::from_parts(input.bundler.as_str(), input.stats)?;
    if let (BundlerStats::Esbuild(stats), BundlerOptions::Esbuild(options)) = (&mut stats, &options)
    {
        // Shims that only forward the build options still get named entries.
        if stats.entry_points.is_none() {
            stats.entry_points = options.entry_points.clone();
        }
    }
    let stats = stats.into_build_stats(&context.path_context());

    Ok(ReportBuilder::new(context)
        .stats(stats)
        .warnings(input.warnings)
        .warnings(warnings)
        .errors(input.errors)
        .duration_ms(input.duration_ms)
        .build())
}

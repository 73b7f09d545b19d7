//! # tally-report
//!
//! Cross-bundler build reports and telemetry metrics.
//!
//! Bundler shims hand over what they know about a build: the options the
//! bundler was configured with and its native statistics. This crate turns
//! that into one canonical [`BuildReport`] of inputs, outputs and entries,
//! whatever the bundler, and flattens the report into tagged [`Metric`]s.
//!
//! ## Overview
//!
//! ```text
//! BuildInput ─► adapters (BuildContext) ─► tally-graph (DependencyGraph)
//!                                                  │
//!                      metrics (Vec<Metric>) ◄─ report (BuildReport)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tally_report::{BuildInput, NativeRuntime, TelemetryOptions, process_build};
//!
//! let input: BuildInput = serde_json::from_value(json!({
//!     "bundler": "esbuild",
//!     "options": { "absWorkingDir": "/project", "outdir": "dist" },
//!     "stats": {
//!         "metafile": {
//!             "inputs": { "src/index.js": { "bytes": 120, "imports": [] } },
//!             "outputs": {
//!                 "dist/index.js": {
//!                     "bytes": 90,
//!                     "entryPoint": "src/index.js",
//!                     "inputs": { "src/index.js": { "bytesInOutput": 90 } }
//!                 }
//!             }
//!         }
//!     }
//! }))
//! .unwrap();
//!
//! let outcome = process_build(input, &TelemetryOptions::default(), &NativeRuntime::new());
//! assert!(outcome.error.is_none());
//! assert_eq!(outcome.report.entries[0].name, "src/index.js");
//! assert_eq!(outcome.report.outputs[0].name, "index.js");
//! ```
//!
//! ## Logging
//!
//! The library emits `tracing` events only. Enable the `logging` feature for
//! [`init_logging`] helpers that install a subscriber.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod adapters;
pub mod context;
pub mod metrics;
pub mod pipeline;
pub mod report;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use adapters::{BundlerAdapter, BundlerOptions};
pub use context::{BuildContext, BundlerName};
pub use metrics::{Metric, MetricType, TelemetryOptions, finalize, universal_metrics};
pub use pipeline::{BuildInput, BuildOutcome, process_build, try_process_build};
pub use report::{BuildReport, Entry, Input, Output, ReportBuilder, build_report};

// Re-export the graph types that appear in public signatures
pub use tally_graph::{DependencyGraph, NativeRuntime, PathContext, Runtime, RuntimeError};

#[cfg(feature = "test-utils")]
pub use tally_graph::TestRuntime;

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bundler options that cannot be read.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A non-path value among the build inputs.
    #[error("Invalid input type: {0}")]
    InvalidInputType(String),

    /// The bundler options name no output directory.
    #[error("No output directory configured for {bundler}")]
    MissingOutDir { bundler: BundlerName },

    /// Error from the graph crate.
    #[error("Graph error: {0}")]
    Graph(#[from] tally_graph::Error),

    /// Host runtime failure.
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, Error>;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::InvalidInputType(_) => "INVALID_INPUT_TYPE",
            Error::MissingOutDir { .. } => "MISSING_OUT_DIR",
            Error::Graph(_) => "GRAPH_ERROR",
            Error::Runtime(_) => "RUNTIME_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Io(_) => "IO_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::InvalidConfig(msg) => Some(Box::new(format!(
                "The bundler options do not have the expected shape.\nError: {msg}"
            ))),
            Error::InvalidInputType(value) => Some(Box::new(format!(
                "rollup `input` must be a path, a list of paths or an object of paths, found {value}."
            ))),
            Error::MissingOutDir { bundler } => Some(Box::new(format!(
                "Set the output path in the {bundler} configuration so files can be attributed."
            ))),
            Error::Graph(tally_graph::Error::InvalidStats(_)) => Some(Box::new(
                "The stats document does not match the bundler it claims to come from.",
            )),
            _ => None,
        }
    }
}

//! # tally-graph
//!
//! Canonical dependency graphs built from bundler statistics.
//!
//! Every bundler reports a build in its own format. This crate reads those
//! formats and reconciles them into one graph of modules, outputs and
//! entries keyed by normalized module identity.
//!
//! ## Overview
//!
//! ```text
//! esbuild metafile ─┐
//! webpack stats ────┼─► BundlerStats ─► BuildStats ─► DependencyGraph
//! rollup bundle ────┘                        ▲
//!                                 paths::normalize (PathContext)
//! ```
//!
//! - [`paths`]: identity normalization (`normalize`, `get_type`, common dirs)
//! - [`stats`]: native bundler formats and the canonical [`BuildStats`]
//! - [`graph`]: the [`DependencyGraph`] with entry and dependency queries
//! - [`runtime`]: the host capabilities the pipeline is allowed to use
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tally_graph::{BundlerStats, DependencyGraph, PathContext};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = PathContext::new("/project", "/project/dist");
//! let stats = BundlerStats::from_value(json!({
//!     "bundler": "esbuild",
//!     "stats": {
//!         "metafile": {
//!             "inputs": {
//!                 "src/index.js": { "bytes": 120, "imports": [{ "path": "src/util.js" }] },
//!                 "src/util.js": { "bytes": 40, "imports": [] }
//!             },
//!             "outputs": {
//!                 "dist/index.js": {
//!                     "bytes": 90,
//!                     "entryPoint": "src/index.js",
//!                     "inputs": { "src/index.js": {}, "src/util.js": {} }
//!                 }
//!             }
//!         },
//!         "entryPoints": { "index": "src/index.js" }
//!     }
//! }))?;
//!
//! let graph = DependencyGraph::build(&stats.into_build_stats(&ctx), &ctx);
//! assert_eq!(graph.dependencies("src/index.js").collect::<Vec<_>>(), vec!["src/util.js"]);
//! assert_eq!(graph.entry_tags("src/util.js").collect::<Vec<_>>(), vec!["index"]);
//! # Ok(())
//! # }
//! ```

pub mod graph;
pub mod paths;
pub mod runtime;
pub mod stats;

pub use graph::{DependencyGraph, EntryNode, ModuleNode, OutputNode};
pub use paths::{
    INJECTION_STUB, PathContext, absolute_path, clean_name, clean_path, get_type,
    is_injection_file, nearest_common_dir, normalize,
};
pub use stats::{BuildStats, BundlerStats, EntryPoint, RawModule, RawOutput};

// Re-export runtime types
pub use runtime::native::NativeRuntime;
pub use runtime::{Runtime, RuntimeError, RuntimeResult};

// Test utilities (available in test builds)
#[cfg(any(test, doctest, feature = "test-utils"))]
pub use runtime::test_utils::TestRuntime;

/// Error types for graph operations.
///
/// Building the graph itself cannot fail. Only reading native statistics can.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Statistics document that does not match any known bundler format.
    #[error("Invalid stats: {0}")]
    InvalidStats(String),
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests;

//! Smoke tests for tally-graph.
//!
//! These are fast, deterministic tests that verify basic functionality
//! and invariants across the modules of the crate.
//!
//! For thorough property-based testing, see property_tests.rs (requires proptest feature).

use crate::paths::{PathContext, get_type, nearest_common_dir, normalize};
use crate::stats::BundlerStats;
use crate::DependencyGraph;
use serde_json::json;
use std::path::{Path, PathBuf};

fn ctx() -> PathContext {
    PathContext::new("/cwd", "/cwd/dist")
}

/// Two entries sharing one module, as esbuild reports them.
fn shared_module_stats() -> BundlerStats {
    BundlerStats::from_value(json!({
        "bundler": "esbuild",
        "stats": {
            "entryPoints": { "e1": "./src/e1.js", "e2": "./src/e2.js" },
            "metafile": {
                "inputs": {
                    "src/e1.js": { "bytes": 10, "imports": [{ "path": "src/shared.js" }] },
                    "src/e2.js": { "bytes": 20, "imports": [{ "path": "src/shared.js" }] },
                    "src/shared.js": { "bytes": 5, "imports": [] }
                },
                "outputs": {
                    "dist/e1.js": {
                        "bytes": 100,
                        "entryPoint": "src/e1.js",
                        "inputs": { "src/e1.js": {}, "src/shared.js": {} }
                    },
                    "dist/e1.js.map": { "bytes": 300, "inputs": {} },
                    "dist/e2.js": {
                        "bytes": 200,
                        "entryPoint": "src/e2.js",
                        "inputs": { "src/e2.js": {}, "src/shared.js": {} }
                    }
                }
            }
        }
    }))
    .expect("valid esbuild stats")
}

#[test]
fn test_shared_module_belongs_to_both_entries() {
    let stats = shared_module_stats().into_build_stats(&ctx());
    let graph = DependencyGraph::build(&stats, &ctx());

    let tags: Vec<_> = graph.entry_tags("src/shared.js").collect();
    assert_eq!(tags, vec!["e1", "e2"]);

    for entry in ["e1", "e2"] {
        let inputs = graph.entry_inputs(entry).expect("entry exists");
        assert!(inputs.contains("src/shared.js"), "{entry} misses shared module");
    }
    assert_eq!(graph.entry_tags("src/e1.js").collect::<Vec<_>>(), vec!["e1"]);
}

#[test]
fn test_entry_outputs_include_sourcemaps() {
    let stats = shared_module_stats().into_build_stats(&ctx());
    let graph = DependencyGraph::build(&stats, &ctx());

    let e1: Vec<_> = graph.entry_outputs("e1").unwrap().iter().cloned().collect();
    // e2.js carries the shared module, so it counts for e1 too.
    assert_eq!(e1, vec!["e1.js", "e2.js", "e1.js.map"]);
    let e2: Vec<_> = graph.entry_outputs("e2").unwrap().iter().cloned().collect();
    assert_eq!(e2, vec!["e1.js", "e2.js", "e1.js.map"]);
}

/// Graph invariant: dependency/dependent symmetry.
#[test]
fn test_dependency_dependent_symmetry() {
    let stats = shared_module_stats().into_build_stats(&ctx());
    let graph = DependencyGraph::build(&stats, &ctx());

    for module in graph.modules() {
        for dependency in graph.dependencies(&module.id) {
            assert!(
                graph.dependents(dependency).any(|d| d == module.id),
                "{} -> {dependency} has no reverse edge",
                module.id
            );
        }
        for dependent in graph.dependents(&module.id) {
            assert!(graph.dependencies(dependent).any(|d| d == module.id));
        }
    }
    assert_eq!(graph.dependents("src/shared.js").count(), 2);
}

#[test]
fn test_build_is_deterministic() {
    let first = DependencyGraph::build(&shared_module_stats().into_build_stats(&ctx()), &ctx());
    let second = DependencyGraph::build(&shared_module_stats().into_build_stats(&ctx()), &ctx());

    let ids = |graph: &DependencyGraph| {
        graph
            .modules()
            .map(|module| module.id.clone())
            .chain(graph.outputs().map(|output| output.id.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(
        first.entries().collect::<Vec<_>>(),
        second.entries().collect::<Vec<_>>()
    );
}

#[test]
fn test_type_detection() {
    assert_eq!(get_type("webpack/runtime"), "runtime");
    assert_eq!(get_type("path/to/file.js"), "js");
    assert_eq!(get_type("unknown"), "unknown");
}

#[test]
fn test_normalization_is_idempotent() {
    let cases = [
        "/cwd/dist/path.js",
        "/cwd/path.js",
        "./__DATADOG_INJECTION_STUB",
        "a-loader!b-loader!/cwd/node_modules/pkg/index.js?x=1",
        "webpack/runtime/make namespace object",
    ];

    for raw in cases {
        let once = normalize(raw, &ctx());
        assert_eq!(normalize(&once, &ctx()), once, "{raw}");
    }
}

#[test]
fn test_nearest_common_dir() {
    let fallback = Path::new("/fallback");
    assert_eq!(
        nearest_common_dir(&["/a/b/c/d", "/a/b/e", "/a/b/c"], fallback),
        PathBuf::from("/a/b")
    );
    assert_eq!(nearest_common_dir(&["/"], fallback), PathBuf::from("/fallback"));
}

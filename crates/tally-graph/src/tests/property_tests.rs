//! Property-based tests for tally-graph using proptest.
//!
//! Run with: cargo test --features proptest --package tally-graph property_tests

use crate::DependencyGraph;
use crate::paths::{PathContext, nearest_common_dir, normalize};
use crate::stats::{BuildStats, RawModule};
use proptest::prelude::*;
use std::path::{Path, PathBuf};

fn ctx() -> PathContext {
    PathContext::new("/cwd", "/cwd/dist")
}

/// Raw paths with the decorations bundlers add.
fn raw_path_strategy() -> impl Strategy<Value = String> {
    let prefix = prop::sample::select(vec![
        "", "\0", "/cwd/", "/cwd/dist/", "./", "../", "/other/", "loader!", "a!b!/cwd/",
        "/cwd/node_modules/", "webpack/runtime/",
    ]);
    let suffix = prop::sample::select(vec!["", "?query", "%3Fx", "|y", "!"]);
    (prefix, prop::collection::vec("[a-zA-Z0-9_ .-]{1,8}", 1..=4), suffix)
        .prop_map(|(prefix, parts, suffix)| format!("{prefix}{}{suffix}", parts.join("/")))
}

fn dir_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec("[a-c]{1,2}", 1..=4)
        .prop_map(|parts| PathBuf::from(format!("/{}", parts.join("/"))))
}

fn graph_strategy() -> impl Strategy<Value = BuildStats> {
    prop::collection::vec(
        ("[a-f]", prop::collection::vec("[a-f]", 0..=4)),
        1..=12,
    )
    .prop_map(|modules| BuildStats {
        modules: modules
            .into_iter()
            .map(|(id, imports)| RawModule {
                id: format!("/cwd/src/{id}.js"),
                size: 1,
                imports: imports
                    .into_iter()
                    .map(|import| format!("/cwd/src/{import}.js"))
                    .collect(),
            })
            .collect(),
        ..Default::default()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// normalize(normalize(p)) == normalize(p)
    #[test]
    fn prop_normalize_idempotent(raw in raw_path_strategy()) {
        let once = normalize(&raw, &ctx());
        prop_assert_eq!(normalize(&once, &ctx()), once);
    }

    /// A single directory is its own nearest common directory.
    #[test]
    fn prop_common_dir_of_one(dir in dir_strategy()) {
        prop_assert_eq!(nearest_common_dir(&[&dir], Path::new("/fallback")), dir);
    }

    /// The common directory is an ancestor of every input.
    #[test]
    fn prop_common_dir_is_ancestor(dirs in prop::collection::vec(dir_strategy(), 1..=5)) {
        let common = nearest_common_dir(&dirs, Path::new("/fallback"));
        if common != Path::new("/fallback") {
            for dir in &dirs {
                prop_assert!(dir.starts_with(&common));
            }
        }
    }

    /// A imports B ⟺ B has A among its dependents.
    #[test]
    fn prop_dependency_dependent_symmetry(stats in graph_strategy()) {
        let graph = DependencyGraph::build(&stats, &ctx());
        for module in graph.modules() {
            for dependency in graph.dependencies(&module.id) {
                prop_assert!(graph.dependents(dependency).any(|d| d == module.id));
            }
            for dependent in graph.dependents(&module.id) {
                prop_assert!(graph.dependencies(dependent).any(|d| d == module.id));
            }
        }
    }
}

//! Integration tests for bundler adapters against a real filesystem.

use serde_json::json;
use std::fs;
use tally_report::adapters::rollup::{RollupOptions, compute_cwd, highest_package_json_dir};
use tally_report::{BundlerAdapter, NativeRuntime};
use tempfile::TempDir;

#[test]
fn rollup_cwd_uses_package_json_on_disk() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().canonicalize().unwrap();
    let app = root.join("packages").join("app");
    fs::create_dir_all(app.join("src")).unwrap();
    fs::write(root.join("package.json"), "{}").unwrap();
    fs::write(app.join("package.json"), "{}").unwrap();

    let options: RollupOptions = serde_json::from_value(json!({
        "input": [app.join("src/index.js").display().to_string()]
    }))
    .unwrap();

    let runtime = NativeRuntime::new();
    // A stray package.json above the temp dir would widen the root past it.
    let expected = root
        .parent()
        .and_then(|parent| highest_package_json_dir(parent, &runtime))
        .unwrap_or_else(|| root.clone());

    assert_eq!(highest_package_json_dir(&app.join("src"), &runtime), Some(expected.clone()));
    assert_eq!(compute_cwd(&options, &runtime).unwrap(), expected);

    let context = options.extract(&runtime).unwrap();
    assert_eq!(context.cwd, expected);
    assert_eq!(context.out_dir, expected.join("dist"));
}

#[test]
fn rollup_sibling_packages_on_disk_meet_at_their_parent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().canonicalize().unwrap();
    for package in ["a", "b"] {
        fs::create_dir_all(root.join(package).join("src")).unwrap();
        fs::write(root.join(package).join("package.json"), "{}").unwrap();
    }

    let runtime = NativeRuntime::new();
    if root
        .parent()
        .and_then(|parent| highest_package_json_dir(parent, &runtime))
        .is_some()
    {
        // Both packages would widen to the stray package.json instead
        return;
    }

    let options: RollupOptions = serde_json::from_value(json!({
        "input": {
            "a": root.join("a/src/index.js").display().to_string(),
            "b": root.join("b/src/index.js").display().to_string()
        },
        "output": { "dir": root.join("a/dist").display().to_string() }
    }))
    .unwrap();

    let context = options.extract(&runtime).unwrap();
    assert_eq!(context.cwd, root);
    assert_eq!(context.out_dir, root.join("a/dist"));
}

#[test]
fn rollup_extract_on_disk_defaults_out_dir() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("lib")).unwrap();

    let options: RollupOptions = serde_json::from_value(json!({
        "input": { "a": root.join("lib/a.js").display().to_string() },
        "output": { "dir": root.join("build").display().to_string() }
    }))
    .unwrap();

    let context = options.extract(&NativeRuntime::new()).unwrap();
    assert_eq!(context.out_dir, root.join("build"));
    assert!(context.raw_config.get("input").is_some());
}

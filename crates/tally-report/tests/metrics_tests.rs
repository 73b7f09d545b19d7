//! Integration tests for metric emission and filtering.

mod helpers;

use helpers::{esbuild_two_entries, report_for};
use tally_report::{Metric, MetricType, TelemetryOptions, finalize, universal_metrics};

fn find<'a>(metrics: &'a [Metric], name: &str, tag: &str) -> Option<&'a Metric> {
    metrics
        .iter()
        .find(|metric| metric.metric == name && metric.tags.iter().any(|t| t == tag))
}

#[test]
fn build_wide_counts() {
    let metrics = universal_metrics(&report_for(esbuild_two_entries()));
    let value = |name: &str| {
        metrics
            .iter()
            .find(|metric| metric.metric == name)
            .map(|metric| metric.value)
    };

    assert_eq!(value("assets.count"), Some(4));
    assert_eq!(value("entries.count"), Some(2));
    assert_eq!(value("modules.count"), Some(3));
    assert_eq!(value("warnings.count"), Some(1));
    assert_eq!(value("errors.count"), Some(0));
    assert_eq!(value("compilation.duration"), Some(1500));
}

#[test]
fn module_metrics_carry_every_entry_tag() {
    let metrics = universal_metrics(&report_for(esbuild_two_entries()));

    let size = find(&metrics, "modules.size", "moduleName:src/shared.js").unwrap();
    assert_eq!(size.kind, MetricType::Size);
    assert_eq!(size.value, 50);
    assert_eq!(
        size.tags,
        vec![
            "moduleName:src/shared.js",
            "moduleType:js",
            "entryName:e1",
            "entryName:e2",
        ]
    );

    let dependents = find(&metrics, "modules.dependents", "moduleName:src/shared.js").unwrap();
    assert_eq!(dependents.value, 2);
}

#[test]
fn asset_metrics_are_tagged_with_contributing_entries() {
    let metrics = universal_metrics(&report_for(esbuild_two_entries()));

    let shared = find(&metrics, "assets.size", "assetName:chunk-shared.js").unwrap();
    assert_eq!(shared.value, 500);
    assert!(shared.tags.contains(&"entryName:e1".to_string()));
    assert!(shared.tags.contains(&"entryName:e2".to_string()));

    let map = find(&metrics, "assets.size", "assetName:e1.js.map").unwrap();
    assert!(map.tags.contains(&"entryName:e1".to_string()));
    assert!(!map.tags.contains(&"entryName:e2".to_string()));

    let modules = find(&metrics, "assets.modules.count", "assetName:e1.js").unwrap();
    assert_eq!(modules.value, 1);
}

#[test]
fn entry_metrics() {
    let metrics = universal_metrics(&report_for(esbuild_two_entries()));

    let tag = "entryName:e1";
    assert_eq!(find(&metrics, "entries.size", tag).unwrap().value, 1000);
    assert_eq!(find(&metrics, "entries.modules.count", tag).unwrap().value, 2);
    assert_eq!(find(&metrics, "entries.assets.count", tag).unwrap().value, 3);
}

#[test]
fn default_filters_drop_small_and_noisy_metrics() {
    let metrics = finalize(
        universal_metrics(&report_for(esbuild_two_entries())),
        &TelemetryOptions::default(),
    );
    let names: Vec<_> = metrics
        .iter()
        .map(|metric| metric.metric.as_str())
        .collect();

    // Small module sizes and sourcemaps go, entry metrics stay.
    assert!(!names.contains(&"modules.size"));
    assert!(!names.contains(&"assets.count"));
    assert!(names.contains(&"entries.count"));
    assert!(names.contains(&"warnings.count"));
    assert!(!names.contains(&"errors.count"));
    assert!(names.contains(&"entries.size"));
    assert!(names.contains(&"compilation.duration"));
    assert!(
        metrics
            .iter()
            .all(|metric| metric.tag_value("assetName") != Some("e1.js.map"))
    );
}

#[test]
fn asset_named_like_a_root_module_keeps_that_module() {
    // `index.js` at the project root and `dist/index.js` both read `index.js`
    let report = report_for(serde_json::json!({
        "bundler": "esbuild",
        "options": { "absWorkingDir": "/project", "outdir": "dist" },
        "stats": {
            "entryPoints": { "app": "index.js" },
            "metafile": {
                "inputs": { "index.js": { "bytes": 40, "imports": [] } },
                "outputs": {
                    "dist/index.js": {
                        "bytes": 60,
                        "entryPoint": "index.js",
                        "inputs": { "index.js": { "bytesInOutput": 38 } }
                    }
                }
            }
        }
    }));

    assert_eq!(report.input("index.js").map(|input| input.size), Some(40));
    assert_eq!(report.output("index.js").map(|output| output.size), Some(60));
    assert_eq!(report.output_inputs("index.js").into_iter().collect::<Vec<_>>(), vec!["index.js"]);

    let metrics = universal_metrics(&report);
    let size = find(&metrics, "assets.size", "assetName:index.js").unwrap();
    assert_eq!(size.value, 60);
    assert_eq!(size.tags, vec!["assetName:index.js", "assetType:js", "entryName:app"]);

    let modules = find(&metrics, "assets.modules.count", "assetName:index.js").unwrap();
    assert_eq!(modules.value, 1);
}

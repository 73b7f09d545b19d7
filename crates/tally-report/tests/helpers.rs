//! Shared test utilities for tally-report tests
//!
//! Build documents are written inline with `serde_json::json!` so every test
//! shows the exact bundler output it exercises.

#![allow(dead_code)]

use serde_json::{Value, json};
use tally_graph::TestRuntime;
use tally_report::{BuildInput, BuildReport, TelemetryOptions, try_process_build};

/// Runtime rooted at `/cwd` with no files.
pub fn test_runtime() -> TestRuntime {
    TestRuntime::new("/cwd")
}

/// Telemetry options that keep every metric.
pub fn unfiltered() -> TelemetryOptions {
    TelemetryOptions {
        default_filters: false,
        ..Default::default()
    }
}

pub fn build_input(value: Value) -> BuildInput {
    serde_json::from_value(value).expect("valid build input")
}

/// Run the whole pipeline and panic on error.
pub fn report_for(value: Value) -> BuildReport {
    let (report, _) = try_process_build(build_input(value), &unfiltered(), &test_runtime())
        .expect("report should build");
    report
}

/// Two esbuild entries sharing `src/shared.js`.
pub fn esbuild_two_entries() -> Value {
    json!({
        "bundler": "esbuild",
        "options": {
            "absWorkingDir": "/cwd",
            "outdir": "dist",
            "entryPoints": { "e1": "./src/e1.js", "e2": "./src/e2.js" }
        },
        "stats": {
            "entryPoints": { "e1": "./src/e1.js", "e2": "./src/e2.js" },
            "metafile": {
                "inputs": {
                    "src/e1.js": { "bytes": 100, "imports": [{ "path": "src/shared.js", "kind": "import-statement" }] },
                    "src/e2.js": { "bytes": 200, "imports": [
                        { "path": "src/shared.js", "kind": "import-statement" },
                        { "path": "react", "kind": "import-statement", "external": true }
                    ] },
                    "src/shared.js": { "bytes": 50, "imports": [] }
                },
                "outputs": {
                    "dist/e1.js": {
                        "bytes": 1000,
                        "entryPoint": "src/e1.js",
                        "inputs": { "src/e1.js": { "bytesInOutput": 90 } },
                        "imports": [{ "path": "dist/chunk-shared.js", "kind": "import-statement" }]
                    },
                    "dist/e2.js": {
                        "bytes": 2000,
                        "entryPoint": "src/e2.js",
                        "inputs": { "src/e2.js": { "bytesInOutput": 190 } },
                        "imports": [{ "path": "dist/chunk-shared.js", "kind": "import-statement" }]
                    },
                    "dist/chunk-shared.js": {
                        "bytes": 500,
                        "inputs": { "src/shared.js": { "bytesInOutput": 45 } }
                    },
                    "dist/e1.js.map": { "bytes": 3000, "inputs": {} }
                }
            }
        },
        "warnings": ["a warning"],
        "durationMs": 1500
    })
}

/// webpack build with a concatenated module and a sourcemap.
pub fn webpack_build() -> Value {
    json!({
        "bundler": "webpack",
        "version": "5.90.0",
        "options": { "context": "/cwd", "output": { "path": "/cwd/dist" } },
        "stats": {
            "outputPath": "/cwd/dist",
            "modules": [
                {
                    "identifier": "/cwd/src/index.js + 1 modules",
                    "size": 300,
                    "chunks": [0],
                    "modules": [
                        { "identifier": "/cwd/node_modules/babel-loader/lib/index.js!/cwd/src/index.js", "size": 200 },
                        { "identifier": "/cwd/src/util.js", "size": 100,
                          "reasons": [{ "moduleIdentifier": "/cwd/node_modules/babel-loader/lib/index.js!/cwd/src/index.js" }] }
                    ]
                },
                { "identifier": "webpack/runtime/make namespace object", "size": 40, "chunks": [0] }
            ],
            "chunks": [{ "id": 0, "names": ["main"], "files": ["main.js"], "entry": true, "initial": true }],
            "assets": [
                { "name": "main.js", "size": 1200, "chunks": [0] },
                { "name": "main.js.map", "size": 4000, "chunks": [0] }
            ],
            "entrypoints": { "main": { "chunks": [0], "assets": [{ "name": "main.js" }, { "name": "main.js.map" }] } }
        }
    })
}

/// rollup build with a shared chunk and helper modules.
pub fn rollup_build() -> Value {
    json!({
        "bundler": "rollup",
        "options": {
            "input": { "main": "/cwd/src/main.js" },
            "output": { "dir": "/cwd/dist" }
        },
        "stats": {
            "bundle": {
                "main.js": {
                    "type": "chunk",
                    "fileName": "main.js",
                    "name": "main",
                    "isEntry": true,
                    "facadeModuleId": "/cwd/src/main.js",
                    "modules": {
                        "/cwd/src/main.js": { "renderedLength": 60 },
                        "\u{0}commonjsHelpers.js": { "renderedLength": 10 }
                    },
                    "imports": ["lib.js"],
                    "size": 80
                },
                "lib.js": {
                    "type": "chunk",
                    "fileName": "lib.js",
                    "modules": { "/cwd/src/lib.js": { "renderedLength": 30 } },
                    "size": 35
                }
            },
            "modules": {
                "/cwd/src/main.js": { "importedIds": ["/cwd/src/lib.js", "\u{0}commonjsHelpers.js"] },
                "/cwd/src/lib.js": { "importedIds": [] }
            }
        }
    })
}

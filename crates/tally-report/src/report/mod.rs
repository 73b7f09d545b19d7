//! Canonical build report.
//!
//! Plain serializable records. Every name is a normalized module or output
//! identity, every `filepath` is absolute.

pub mod aggregate;
pub mod builder;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::context::BundlerName;

pub use aggregate::build_report;
pub use builder::ReportBuilder;

/// A source module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub name: String,
    pub filepath: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: String,
    /// Names of the inputs imported directly.
    pub dependencies: Vec<String>,
    /// Names of the inputs importing this one directly.
    pub dependents: Vec<String>,
}

/// An emitted file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub name: String,
    pub filepath: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: String,
    /// Names of the inputs, or of the output a sourcemap maps.
    pub inputs: Vec<String>,
}

/// An entry point of the build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub name: String,
    /// Path of the main output.
    pub filepath: String,
    /// Bytes of the main output.
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: String,
    /// Every input reachable from the entry. Shared inputs appear in each
    /// entry that reaches them.
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub bundler: BundlerName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub cwd: String,
    pub out_dir: String,
    #[serde(default)]
    pub inputs: Vec<Input>,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl BuildReport {
    /// A report with nothing in it, for builds that could not be analyzed.
    pub fn empty(bundler: BundlerName) -> Self {
        Self {
            bundler,
            version: None,
            cwd: String::new(),
            out_dir: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            entries: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            duration_ms: None,
        }
    }

    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.iter().find(|input| input.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.iter().find(|output| output.name == name)
    }

    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Entries whose inputs contain `input`, in entry order.
    pub fn entry_tags(&self, input: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.inputs.iter().any(|name| name == input))
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// Inputs that end up in `output`, through the outputs it derives from.
    ///
    /// Modules and outputs are named independently, so `index.js` can be both
    /// a source at the project root and a file in the output directory. A name
    /// among the inputs is a module first.
    pub fn output_inputs(&self, output: &str) -> IndexSet<&str> {
        let mut inputs = IndexSet::new();
        let mut seen = IndexSet::new();
        let mut stack = vec![output];

        while let Some(name) = stack.pop() {
            if !seen.insert(name) {
                continue;
            }
            let Some(output) = self.output(name) else {
                continue;
            };
            for input in &output.inputs {
                if self.input(input).is_some() {
                    inputs.insert(input.as_str());
                } else {
                    stack.push(input);
                }
            }
        }

        inputs
    }

    /// Total bytes written.
    pub fn total_output_size(&self) -> u64 {
        self.outputs.iter().map(|output| output.size).sum()
    }
}

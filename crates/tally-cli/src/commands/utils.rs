//! Shared helpers for reading build documents and writing JSON.

use crate::error::{CliError, Result};
use serde::Serialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tally_report::{BuildInput, TelemetryOptions};
use tokio::io::AsyncReadExt;

/// Read and parse a build document; `-` reads stdin.
pub(crate) async fn read_build_input(path: &Path) -> Result<BuildInput> {
    let from_stdin = path == Path::new("-");
    let json = if from_stdin {
        let mut json = String::new();
        tokio::io::stdin().read_to_string(&mut json).await?;
        json
    } else {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|err| CliError::reading(path, err))?
    };

    let input = BuildInput::from_json(&json).map_err(|source| CliError::InvalidDocument {
        origin: if from_stdin {
            "stdin".to_string()
        } else {
            path.display().to_string()
        },
        source,
    })?;
    tracing::debug!(bundler = %input.bundler, "read build document");
    Ok(input)
}

/// Write `value` as pretty JSON, creating parent directories.
pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| CliError::writing(path, err))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|err| CliError::writing(path, err))?;
    tracing::debug!(path = %path.display(), "wrote json");
    Ok(())
}

/// Telemetry options stamped with the current time when none is configured.
pub(crate) fn stamped(telemetry: &TelemetryOptions) -> TelemetryOptions {
    let mut telemetry = telemetry.clone();
    if telemetry.timestamp.is_none() {
        telemetry.timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_secs());
    }
    telemetry
}

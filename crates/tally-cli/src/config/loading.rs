use crate::config::{ConfigOverrides, DEFAULT_CONFIG_FILE, ENV_PREFIX, TallyConfig};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use std::path::Path;

/// Top-level sections whose keys are nested one level below.
const SECTIONS: &[&str] = &["telemetry", "output"];

impl TallyConfig {
    /// Load configuration from multiple sources.
    /// Priority: CLI flags > environment variables > config file > defaults
    pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        Self::figment(config_path, overrides)?
            .extract()
            .map_err(|e| {
                let field = if e.path.is_empty() {
                    "configuration".to_string()
                } else {
                    e.path.join(".")
                };
                ConfigError::InvalidValue {
                    field,
                    value: e.kind.to_string(),
                    hint: format!("Check {DEFAULT_CONFIG_FILE} and {ENV_PREFIX}* variables"),
                }
                .into()
            })
    }

    /// The layered provider stack, before extraction.
    pub fn figment(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Json::file(path));
        }

        // TALLY_TELEMETRY_PREFIX, TALLY_OUTPUT_REPORT, TALLY_LOG_LEVEL, ...
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .lowercase(false)
                .map(|key| env_key(key.as_str()).into()),
        );

        // Flags win; tags accumulate on top of the configured ones
        Ok(figment.admerge(Serialized::defaults(overrides)))
    }
}

/// Map an environment key (prefix already stripped) to its config path.
///
/// ```
/// use tally_cli::config::env_key;
///
/// assert_eq!(env_key("LOG_LEVEL"), "logLevel");
/// assert_eq!(env_key("TELEMETRY_DEFAULT_FILTERS"), "telemetry.defaultFilters");
/// assert_eq!(env_key("output_report"), "output.report");
/// ```
pub fn env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();

    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{}", camel_case(rest));
        }
    }
    camel_case(&key)
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, part) in key.split('_').filter(|part| !part.is_empty()).enumerate() {
        let mut chars = part.chars();
        if i > 0 {
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
            }
        }
        out.push_str(chars.as_str());
    }
    out
}

use tally_report::LogLevel;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tally.config.json";

/// Prefix of the environment variables merged into the configuration.
pub const ENV_PREFIX: &str = "TALLY_";

pub fn default_log_level() -> LogLevel {
    LogLevel::Info
}

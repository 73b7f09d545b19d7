//! Miette rendering of CLI errors.
//!
//! Pipeline errors keep the code and help `tally-report` gives them.

use super::{CliError, ConfigError};
use miette::{Diagnostic, Severity};
use std::fmt::Display;

impl Diagnostic for CliError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        let code = match self {
            CliError::Report(err) => return err.code(),
            CliError::Config(_) => "tally::config",
            CliError::DocumentNotFound(_) | CliError::InvalidDocument { .. } => "tally::document",
            CliError::Write { .. } => "tally::write",
            CliError::Io(_) => "tally::io",
            CliError::Json(_) => "tally::json",
        };
        Some(Box::new(code))
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        match self {
            CliError::Report(err) => err.help(),
            CliError::Config(ConfigError::NotFound(_)) => Some(Box::new(
                "Create a tally.config.json file or fix the --config path",
            )),
            CliError::Config(ConfigError::InvalidValue { hint, .. }) => Some(Box::new(hint)),
            CliError::DocumentNotFound(_) => Some(Box::new(
                "Pass the JSON document written by a tally bundler plugin, or - to read stdin",
            )),
            CliError::InvalidDocument { .. } => Some(Box::new(
                "A build document is an object with `bundler`, `options` and `stats`",
            )),
            _ => None,
        }
    }
}

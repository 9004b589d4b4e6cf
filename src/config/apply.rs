use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{Cli, Command};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// A config value only fills in an argument the user did not set on the
/// command line or through its environment variable.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(cli: &mut Cli, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !set_by_user(matches, "db")
        && let Some(database) = config.database.as_ref()
    {
        cli.db = Some(PathBuf::from(database));
    }

    if !set_by_user(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        cli.no_color = no_color;
    }

    if !set_by_user(matches, "output_format")
        && let Some(format) = config.output_format
    {
        cli.output_format = format;
    }

    if let Command::Test(test) = &mut cli.command
        && let Some(test_matches) = matches.subcommand_matches("test")
    {
        if !set_by_user(test_matches, "timeout")
            && let Some(timeout) = config.timeout.as_ref()
        {
            test.timeout = timeout.to_duration().map_err(|err| invalid("timeout", err))?;
        }

        if !set_by_user(test_matches, "concurrency")
            && let Some(concurrency) = config.concurrency
        {
            test.concurrency = NonZeroUsize::new(concurrency)
                .ok_or_else(|| invalid("concurrency", ValidationError::ValueTooSmall { min: 1 }))?;
        }
    }

    Ok(())
}

fn set_by_user(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn invalid(field: &'static str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidField { field, source })
}

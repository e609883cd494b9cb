//! Stable entry points for the fuzz targets in `fuzz/`.

use std::path::Path;
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::DriverArgs;
use crate::args::parsers::parse_duration_arg;
use crate::config::apply_config;
use crate::config::types::ConfigFile;
use crate::error::AppResult;

thread_local! {
    static BASE_MATCHES: ArgMatches = DriverArgs::command().get_matches_from(["volley"]);
}

/// Parses a duration argument (e.g. `10s`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_arg_input(input: &str) -> AppResult<Duration> {
    parse_duration_arg(input)
}

/// Parses TOML config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_toml(input: &str) -> AppResult<()> {
    let config: ConfigFile = toml::from_str(input)?;
    apply_config_to_defaults(&config)
}

/// Parses JSON config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<()> {
    let config: ConfigFile = serde_json::from_slice(input)?;
    apply_config_to_defaults(&config)
}

/// Loads a config file from disk to exercise extension handling.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed.
pub fn load_config_file_input(path: &Path) -> AppResult<()> {
    crate::config::load_config_file(path).map(|_| ())
}

/// Runs the practice-target request parser over raw bytes.
///
/// Returns the rejection status when the parser refuses the input and
/// `None` when the bytes parse cleanly or read as a clean close.
///
/// # Errors
///
/// Returns an error when the scratch runtime cannot start.
pub fn parse_http1_request_input(data: &[u8]) -> AppResult<Option<u16>> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    runtime.block_on(async {
        let mut stream = data;
        match crate::target::parse_http1_request(&mut stream).await {
            Ok(_) => Ok(None),
            Err(rejection) => Ok(Some(rejection.status)),
        }
    })
}

fn apply_config_to_defaults(config: &ConfigFile) -> AppResult<()> {
    BASE_MATCHES.with(|matches| {
        let mut args = DriverArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)
    })
}

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::DriverArgs;
use crate::error::AppResult;

use super::types::ConfigFile;

/// Applies settings-file values to CLI arguments.
///
/// Values the user typed on the command line always win; config values only
/// replace defaults (including ones picked up from environment variables).
///
/// # Errors
///
/// Returns an error when a config value fails validation.
pub fn apply_config(
    args: &mut DriverArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = url;
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency = concurrency;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = requests;
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration
    {
        args.duration = duration;
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = timeout.to_duration()?;
    }

    if !is_cli(matches, "disable_keepalive")
        && let Some(disable_keepalive) = config.disable_keepalive
    {
        args.disable_keepalive = disable_keepalive;
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    if !is_cli(matches, "no_banner")
        && let Some(no_banner) = config.no_banner
    {
        args.no_banner = no_banner;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

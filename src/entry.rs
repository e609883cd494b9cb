//! CLI entry for the `volley` load-driver binary.
//!
//! Parsing, config merging, and logging setup happen before the tokio
//! runtime starts; the async phase wires the shared stats, the progress
//! reporter, and the dispatcher together.

use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::DriverArgs;
use crate::error::AppResult;
use crate::shutdown::stop_channel;
use crate::stats::RunStats;

/// Runs one load test from CLI arguments to printed summary.
///
/// # Errors
/// Returns an error when arguments or the config file are invalid, the
/// runtime cannot start, or the run itself fails.
pub fn run() -> AppResult<()> {
    let matches = DriverArgs::command().get_matches();
    let mut args = DriverArgs::from_arg_matches(&matches)?;

    // Config is merged before logging so a config-set `verbose` still
    // shapes the filter.
    apply_config(&mut args, &matches)?;

    crate::system::logger::init_logging(args.verbose, args.no_color);

    if !args.no_banner {
        crate::system::banner::print_cli_banner("load generation", args.no_color);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(&args))
}

fn apply_config(args: &mut DriverArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(args, matches, &config)?;
    }
    Ok(())
}

async fn run_async(args: &DriverArgs) -> AppResult<()> {
    crate::report::print_run_header(args);

    let stats = Arc::new(RunStats::new());
    let (done_tx, _done_rx) = stop_channel();
    let reporter = crate::report::spawn_progress_reporter(&stats, &done_tx, args.no_color);

    let report = crate::http::run_load_test(args, &stats, &done_tx).await?;

    // The reporter drains its final snapshot before the summary prints.
    reporter.await?;
    crate::report::print_summary(&report);
    Ok(())
}

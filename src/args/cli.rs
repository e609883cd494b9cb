use std::time::Duration;

use clap::Parser;

use super::defaults::{
    DEFAULT_CONCURRENCY, DEFAULT_DURATION_SECS, DEFAULT_REQUESTS, DEFAULT_TARGET_LISTEN,
    DEFAULT_TIMEOUT, DEFAULT_URL,
};
use super::parsers::{parse_bool_env, parse_duration_arg};
use super::types::{HttpMethod, RunMode};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent async HTTP load generator - fires a fixed request budget or a fixed time window at a target and reports throughput and latency."
)]
pub struct DriverArgs {
    /// Target URL
    #[arg(long, short, default_value = DEFAULT_URL)]
    pub url: String,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Number of concurrent workers
    #[arg(long, short = 'c', default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Total number of requests to send (0 runs for --duration instead)
    #[arg(long, short = 'n', default_value_t = DEFAULT_REQUESTS)]
    pub requests: u64,

    /// Length of a timed run in seconds (used when --requests is 0)
    #[arg(long, short = 'd', default_value_t = DEFAULT_DURATION_SECS)]
    pub duration: u64,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        short = 't',
        default_value = DEFAULT_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub timeout: Duration,

    /// Disable HTTP keep-alive (open a fresh connection per request)
    #[arg(long = "disable-keepalive", short = 'k')]
    pub disable_keepalive: bool,

    /// Load options from a TOML or JSON config file
    #[arg(long)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,

    /// Skip the startup banner
    #[arg(long = "no-banner")]
    pub no_banner: bool,
}

impl DriverArgs {
    /// A request budget of zero selects a timed run.
    #[must_use]
    pub const fn run_mode(&self) -> RunMode {
        if self.requests == 0 {
            RunMode::Timed(Duration::from_secs(self.duration))
        } else {
            RunMode::Count(self.requests)
        }
    }

    #[must_use]
    pub const fn keep_alive(&self) -> bool {
        !self.disable_keepalive
    }
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Synthetic HTTP practice target with endpoints covering fast, slow, CPU-bound, memory-bound, flaky, and large-payload behavior."
)]
pub struct TargetArgs {
    /// Address to listen on (use port 0 for an ephemeral port)
    #[arg(long, short = 'l', default_value = DEFAULT_TARGET_LISTEN)]
    pub listen: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,

    /// Skip the startup banner
    #[arg(long = "no-banner")]
    pub no_banner: bool,
}

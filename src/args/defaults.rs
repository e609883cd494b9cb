pub(crate) const DEFAULT_USER_AGENT: &str = concat!(
    "volley-loadtest/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/volley-rs/volley)"
);

/// Target URL used when neither the CLI nor a config file provides one.
pub(crate) const DEFAULT_URL: &str = "http://localhost:8080/health";

/// Worker count used when `--concurrency` is not set.
pub(crate) const DEFAULT_CONCURRENCY: usize = 10;

/// Request budget used when `--requests` is not set. Zero selects timed mode.
pub(crate) const DEFAULT_REQUESTS: u64 = 100;

/// Timed-mode window in seconds used when `--duration` is not set.
pub(crate) const DEFAULT_DURATION_SECS: u64 = 10;

/// Per-request timeout used when `--timeout` is not set.
pub(crate) const DEFAULT_TIMEOUT: &str = "30s";

/// Address the practice target binds when `--listen` is not set.
pub(crate) const DEFAULT_TARGET_LISTEN: &str = "127.0.0.1:8080";

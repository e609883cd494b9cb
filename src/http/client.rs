use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::args::{DEFAULT_USER_AGENT, DriverArgs};
use crate::error::{AppError, AppResult, HttpError};

/// How long an idle pooled connection may linger before being closed.
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Validates the target URL once at startup; workers clone the parsed value
/// per request instead of re-parsing the string.
///
/// # Errors
///
/// Returns an error when the URL does not parse or has no host.
pub(super) fn parse_target_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw).map_err(|err| {
        AppError::http(HttpError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    if url.host_str().is_none() {
        return Err(AppError::http(HttpError::UrlMissingHost));
    }
    Ok(url)
}

/// Builds the connection-pooling client shared by every worker.
///
/// The idle pool is sized to the worker count so a keep-alive run can keep
/// one warm connection per worker; disabling keep-alive zeroes the pool so
/// every request opens a fresh connection. Practice targets routinely sit
/// behind self-signed certificates, so certificate validation is off.
///
/// # Errors
///
/// Returns an error when the client cannot be constructed.
pub(super) fn build_client(args: &DriverArgs) -> AppResult<Client> {
    let mut client_builder = Client::builder()
        .timeout(args.timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .danger_accept_invalid_certs(true);

    if args.disable_keepalive {
        client_builder = client_builder
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Some(Duration::from_secs(0)));
    } else {
        client_builder = client_builder
            .pool_max_idle_per_host(args.concurrency.max(1))
            .pool_idle_timeout(Some(POOL_IDLE_TIMEOUT));
    }

    client_builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}

use std::time::Duration;

use clap::Parser;

use super::cli::{DriverArgs, TargetArgs};
use super::parsers::{parse_bool_env, parse_duration_arg};
use super::types::{HttpMethod, RunMode};
use crate::error::{AppError, AppResult, ValidationError};

fn parse_driver_args<I, T>(args: I) -> AppResult<DriverArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    DriverArgs::try_parse_from(args).map_err(AppError::from)
}

fn parse_target_args<I, T>(args: I) -> AppResult<TargetArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TargetArgs::try_parse_from(args).map_err(AppError::from)
}

#[test]
fn parse_args_defaults() -> AppResult<()> {
    let args = parse_driver_args(["volley"])?;

    let expected_no_color = std::env::var("NO_COLOR")
        .ok()
        .and_then(|value| parse_bool_env(&value).ok())
        .unwrap_or(false);

    let checks = [
        (
            args.url == "http://localhost:8080/health",
            "Unexpected url default",
        ),
        (
            matches!(args.method, HttpMethod::Get),
            "Expected HttpMethod::Get",
        ),
        (args.concurrency == 10, "Unexpected concurrency default"),
        (args.requests == 100, "Unexpected requests default"),
        (args.duration == 10, "Unexpected duration default"),
        (
            args.timeout == Duration::from_secs(30),
            "Unexpected timeout default",
        ),
        (
            !args.disable_keepalive,
            "Expected disable_keepalive to be false",
        ),
        (args.keep_alive(), "Expected keep_alive to be true"),
        (args.config.is_none(), "Expected config to be None"),
        (!args.verbose, "Expected verbose to be false"),
        (
            args.no_color == expected_no_color,
            "Unexpected no_color default",
        ),
        (!args.no_banner, "Expected no_banner to be false"),
        (
            args.run_mode() == RunMode::Count(100),
            "Expected count mode by default",
        ),
    ];

    for (ok, msg) in checks {
        if !ok {
            return Err(AppError::validation(msg));
        }
    }

    Ok(())
}

#[test]
fn requests_zero_selects_timed_mode() -> AppResult<()> {
    let args = parse_driver_args(["volley", "-n", "0", "-d", "3"])?;

    if args.run_mode() != RunMode::Timed(Duration::from_secs(3)) {
        return Err(AppError::validation("Expected a 3s timed run"));
    }

    Ok(())
}

#[test]
fn requests_zero_with_zero_duration_is_accepted() -> AppResult<()> {
    let args = parse_driver_args(["volley", "-n", "0", "-d", "0"])?;

    if args.run_mode() != RunMode::Timed(Duration::ZERO) {
        return Err(AppError::validation("Expected an empty timed run"));
    }

    Ok(())
}

#[test]
fn method_parsing_ignores_case() -> AppResult<()> {
    let args = parse_driver_args(["volley", "-X", "POST"])?;

    if !matches!(args.method, HttpMethod::Post) {
        return Err(AppError::validation("Expected HttpMethod::Post"));
    }
    if args.method.as_str() != "POST" {
        return Err(AppError::validation("Unexpected method display name"));
    }

    Ok(())
}

#[test]
fn timeout_accepts_suffixes_and_bare_seconds() -> AppResult<()> {
    let checks = [
        ("500ms", Duration::from_millis(500)),
        ("30s", Duration::from_secs(30)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
        ("5", Duration::from_secs(5)),
    ];

    for (input, expected) in checks {
        let args = parse_driver_args(["volley", "-t", input])?;
        if args.timeout != expected {
            return Err(AppError::validation(format!(
                "Unexpected timeout for input {input}"
            )));
        }
    }

    Ok(())
}

#[test]
fn duration_parser_rejects_bad_input() -> AppResult<()> {
    let checks = [
        (
            matches!(
                parse_duration_arg(""),
                Err(AppError::Validation(ValidationError::DurationEmpty))
            ),
            "Expected DurationEmpty",
        ),
        (
            matches!(
                parse_duration_arg("abc"),
                Err(AppError::Validation(
                    ValidationError::InvalidDurationFormat { .. }
                ))
            ),
            "Expected InvalidDurationFormat",
        ),
        (
            matches!(
                parse_duration_arg("10x"),
                Err(AppError::Validation(ValidationError::InvalidDurationUnit {
                    ..
                }))
            ),
            "Expected InvalidDurationUnit",
        ),
        (
            matches!(
                parse_duration_arg("0s"),
                Err(AppError::Validation(ValidationError::DurationZero))
            ),
            "Expected DurationZero",
        ),
        (
            matches!(
                parse_duration_arg("99999999999999999999s"),
                Err(AppError::Validation(
                    ValidationError::InvalidDurationNumber { .. }
                ))
            ),
            "Expected InvalidDurationNumber on overflowing digits",
        ),
        (
            matches!(
                parse_duration_arg("18446744073709551615h"),
                Err(AppError::Validation(ValidationError::DurationOverflow))
            ),
            "Expected DurationOverflow",
        ),
    ];

    for (ok, msg) in checks {
        if !ok {
            return Err(AppError::validation(msg));
        }
    }

    Ok(())
}

#[test]
fn target_args_defaults() -> AppResult<()> {
    let args = parse_target_args(["volley-target"])?;

    let checks = [
        (args.listen == "127.0.0.1:8080", "Unexpected listen default"),
        (!args.verbose, "Expected verbose to be false"),
        (!args.no_banner, "Expected no_banner to be false"),
    ];

    for (ok, msg) in checks {
        if !ok {
            return Err(AppError::validation(msg));
        }
    }

    Ok(())
}

use std::time::Duration;

use clap::{CommandFactory, FromArgMatches};
use tempfile::tempdir;

use super::types::{ConfigFile, DurationValue};
use super::{apply_config, load_config_file};
use crate::args::{DriverArgs, HttpMethod, RunMode};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

fn parse_driver(argv: &[&str]) -> AppResult<(DriverArgs, clap::ArgMatches)> {
    let matches = DriverArgs::command().try_get_matches_from(argv)?;
    let args = DriverArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("volley.toml");
    let content = r#"
url = "http://localhost:9000/api"
method = "post"
workers = 32
requests = 5000
timeout = "750ms"
disable_keepalive = true
"#;
    std::fs::write(&path, content)?;

    let config = load_config_file(&path)?;
    let timeout = match config.timeout.as_ref() {
        Some(value) => value.to_duration()?,
        None => return Err(AppError::config("expected a timeout value")),
    };

    let checks = [
        (
            config.url.as_deref() == Some("http://localhost:9000/api"),
            "unexpected url",
        ),
        (config.method == Some(HttpMethod::Post), "unexpected method"),
        (
            config.concurrency == Some(32),
            "the workers alias should fill concurrency",
        ),
        (config.requests == Some(5000), "unexpected requests"),
        (timeout == Duration::from_millis(750), "unexpected timeout"),
        (
            config.disable_keepalive == Some(true),
            "unexpected keep-alive setting",
        ),
    ];
    for (ok, label) in checks {
        if !ok {
            return Err(AppError::config(label));
        }
    }
    Ok(())
}

#[test]
fn parse_json_config() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("volley.json");
    let content = r#"{
  "url": "http://localhost:9000/api",
  "method": "delete",
  "concurrency": 8,
  "duration": 45,
  "timeout": 30,
  "no_banner": true
}"#;
    std::fs::write(&path, content)?;

    let config = load_config_file(&path)?;
    let timeout = match config.timeout.as_ref() {
        Some(value) => value.to_duration()?,
        None => return Err(AppError::config("expected a timeout value")),
    };

    let checks = [
        (config.method == Some(HttpMethod::Delete), "unexpected method"),
        (config.concurrency == Some(8), "unexpected concurrency"),
        (config.duration == Some(45), "unexpected duration"),
        (
            timeout == Duration::from_secs(30),
            "bare numbers should read as seconds",
        ),
        (config.no_banner == Some(true), "unexpected banner setting"),
    ];
    for (ok, label) in checks {
        if !ok {
            return Err(AppError::config(label));
        }
    }
    Ok(())
}

#[test]
fn unknown_extension_is_rejected() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("volley.yaml");
    std::fs::write(&path, "url: nope")?;

    match load_config_file(&path) {
        Ok(_) => Err(AppError::config("yaml must be rejected")),
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) => {
            if ext == "yaml" {
                Ok(())
            } else {
                Err(AppError::config(format!("unexpected extension: {}", ext)))
            }
        }
        Err(err) => Err(AppError::config(format!("unexpected error: {}", err))),
    }
}

#[test]
fn missing_extension_is_rejected() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("volleyrc");
    std::fs::write(&path, "url = \"http://localhost\"")?;

    if !matches!(
        load_config_file(&path),
        Err(AppError::Config(ConfigError::MissingExtension))
    ) {
        return Err(AppError::config("extensionless files must be rejected"));
    }
    Ok(())
}

#[test]
fn unreadable_config_is_a_read_error() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("absent.toml");

    if !matches!(
        load_config_file(&path),
        Err(AppError::Config(ConfigError::ReadConfig { .. }))
    ) {
        return Err(AppError::config("a missing file should be a read error"));
    }
    Ok(())
}

#[test]
fn cli_values_beat_config_values() -> AppResult<()> {
    let (mut args, matches) =
        parse_driver(&["volley", "--url", "http://cli.example:1/x", "-c", "3"])?;
    let config = ConfigFile {
        url: Some("http://config.example:2/y".to_owned()),
        concurrency: Some(64),
        requests: Some(9),
        ..ConfigFile::default()
    };

    apply_config(&mut args, &matches, &config)?;

    let checks = [
        (
            args.url == "http://cli.example:1/x",
            "the command line url must win",
        ),
        (args.concurrency == 3, "the command line worker count must win"),
        (args.requests == 9, "defaults yield to config values"),
    ];
    for (ok, label) in checks {
        if !ok {
            return Err(AppError::config(label));
        }
    }
    Ok(())
}

#[test]
fn config_fills_unset_flags() -> AppResult<()> {
    let (mut args, matches) = parse_driver(&["volley"])?;
    let config = ConfigFile {
        method: Some(HttpMethod::Put),
        requests: Some(0),
        duration: Some(7),
        timeout: Some(DurationValue::Text("2m".to_owned())),
        disable_keepalive: Some(true),
        no_banner: Some(true),
        ..ConfigFile::default()
    };

    apply_config(&mut args, &matches, &config)?;

    let checks = [
        (args.method == HttpMethod::Put, "unexpected method"),
        (
            args.run_mode() == RunMode::Timed(Duration::from_secs(7)),
            "a zero request budget from config selects a timed run",
        ),
        (
            args.timeout == Duration::from_secs(120),
            "unexpected timeout",
        ),
        (args.disable_keepalive, "unexpected keep-alive setting"),
        (args.no_banner, "unexpected banner setting"),
    ];
    for (ok, label) in checks {
        if !ok {
            return Err(AppError::config(label));
        }
    }
    Ok(())
}

#[test]
fn config_timeout_zero_is_rejected() -> AppResult<()> {
    let (mut args, matches) = parse_driver(&["volley"])?;
    let config = ConfigFile {
        timeout: Some(DurationValue::Seconds(0)),
        ..ConfigFile::default()
    };

    match apply_config(&mut args, &matches, &config) {
        Err(AppError::Validation(ValidationError::DurationZero)) => Ok(()),
        Ok(()) => Err(AppError::config("a zero timeout must be rejected")),
        Err(err) => Err(AppError::config(format!("unexpected error: {}", err))),
    }
}

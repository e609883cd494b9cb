use std::time::Duration;

use serde::Deserialize;

use crate::args::HttpMethod;
use crate::args::parsers::parse_duration_arg;
use crate::error::{AppError, AppResult, ValidationError};

/// Settings file for the load driver. Every field is optional; the merge in
/// `apply_config` keeps whatever the command line already set.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    #[serde(alias = "workers")]
    pub concurrency: Option<usize>,
    pub requests: Option<u64>,
    pub duration: Option<u64>,
    pub timeout: Option<DurationValue>,
    pub disable_keepalive: Option<bool>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
    pub no_banner: Option<bool>,
}

/// A duration written either as bare seconds (`timeout = 30`) or as text
/// with a unit (`timeout = "500ms"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    /// # Errors
    /// Returns an error when the value is zero or the text form does
    /// not parse as a duration.
    pub fn to_duration(&self) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(AppError::validation(ValidationError::DurationZero))
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}

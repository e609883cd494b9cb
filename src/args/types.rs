use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// How a run terminates: after a fixed request budget or a fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Count(u64),
    Timed(Duration),
}

impl RunMode {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            RunMode::Count(_) => "count",
            RunMode::Timed(_) => "timed",
        }
    }
}

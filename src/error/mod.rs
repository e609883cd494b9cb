mod app;
mod config;
mod http;
mod target;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use target::TargetError;
pub use validation::ValidationError;

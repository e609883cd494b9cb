//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{DriverArgs, TargetArgs};
pub use types::{HttpMethod, RunMode};

pub(crate) use defaults::DEFAULT_USER_AGENT;

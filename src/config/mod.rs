//! Settings-file loading and CLI merge.

pub(crate) mod apply;
mod loader;
pub mod types;

#[cfg(test)]
mod tests;

pub use apply::apply_config;
pub use loader::load_config;

pub(crate) use loader::load_config_file;

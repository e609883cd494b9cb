//! Core library for the `volley` binaries.
//!
//! This crate provides the building blocks behind two executables: the
//! `volley` load driver, which fires a fixed request budget or a fixed
//! time window of concurrent HTTP requests at a target, and
//! `volley-target`, a synthetic HTTP server with endpoints covering
//! fast, slow, CPU-bound, memory-bound, flaky, and large-payload
//! behavior. The primary interface is the pair of command-line
//! applications; library APIs may evolve as they grow.
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
mod report;
pub mod shutdown;
pub mod stats;
mod system;
pub mod target;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;

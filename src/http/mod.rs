//! Request execution: shared client construction, per-worker request
//! cycles, and run dispatch for count and timed modes.

mod client;
mod dispatcher;
mod worker;


pub use dispatcher::{RunReport, partition_requests, run_load_test};

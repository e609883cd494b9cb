//! Live progress line and end-of-run results rendering.

mod progress;
mod summary;


pub(crate) use progress::spawn_progress_reporter;
pub(crate) use summary::{print_run_header, print_summary};

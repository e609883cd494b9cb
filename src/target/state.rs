//! Shared counters for the practice target.
//!
//! One [`TargetState`] lives for the life of the server; every connection
//! task updates it through relaxed atomics, and `/stats` reads it via
//! [`TargetState::snapshot`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug)]
pub(crate) struct TargetState {
    total_requests: AtomicU64,
    total_errors: AtomicU64,
    active_connections: AtomicU64,
    started: Instant,
}

/// Point-in-time copy of the counters, for `/stats` and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StateSnapshot {
    pub(crate) total_requests: u64,
    pub(crate) total_errors: u64,
    pub(crate) active_connections: u64,
    pub(crate) uptime_secs: u64,
}

impl TargetState {
    pub(crate) fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
            active_connections: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    pub(crate) fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.total_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_errors: self.total_errors.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            uptime_secs: self.started.elapsed().as_secs(),
        }
    }
}

/// Keeps the active-connection gauge honest for the lifetime of one
/// connection task, including early exits on socket errors.
pub(super) struct ConnectionGuard {
    state: Arc<TargetState>,
}

impl ConnectionGuard {
    pub(super) fn acquire(state: &Arc<TargetState>) -> Self {
        state.active_connections.fetch_add(1, Ordering::Relaxed);
        Self {
            state: Arc::clone(state),
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        loop {
            let current = self.state.active_connections.load(Ordering::Relaxed);
            let Some(next) = current.checked_sub(1) else {
                break;
            };
            if self
                .state
                .active_connections
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                break;
            }
        }
    }
}

/// Resident set size in whole MiB; 0 when the probe is unavailable.
pub(super) fn memory_usage_mb() -> u64 {
    read_rss_bytes().map_or(0, |bytes| bytes.checked_div(1024 * 1024).unwrap_or(0))
}

fn read_rss_bytes() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let mut parts = statm.split_whitespace();
        let _size = parts.next()?;
        let resident = parts.next()?.parse::<u64>().ok()?;
        // Safety: sysconf is safe to call; we only read the page size.
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if page_size <= 0 {
            return None;
        }
        let page_size = u64::try_from(page_size).ok()?;
        Some(resident.saturating_mul(page_size))
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

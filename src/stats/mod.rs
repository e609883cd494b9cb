//! Lock-free counters shared by every worker in a run.
//!
//! One [`RunStats`] is allocated per run and handed to workers as
//! `Arc<RunStats>`. Every update is a relaxed atomic operation; no lock is
//! held anywhere on the request path. Individual fields are exact, but a
//! reader sampling mid-run may observe a request whose total has been counted
//! while its success/failure classification has not landed yet. After all
//! workers are joined, `total == successful + failed` holds exactly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[cfg(test)]
mod tests;

/// Sentinel for "no latency sample recorded yet".
const MIN_LATENCY_UNSET: u64 = u64::MAX;

#[derive(Debug)]
pub struct RunStats {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    latency_sum_ns: AtomicU64,
    min_latency_ns: AtomicU64,
    max_latency_ns: AtomicU64,
}

/// Point-in-time copy of the counters, for progress lines and the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub latency_sum_ns: u64,
    pub min_latency_ns: Option<u64>,
    pub max_latency_ns: Option<u64>,
}

impl RunStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            successful_requests: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            latency_sum_ns: AtomicU64::new(0),
            min_latency_ns: AtomicU64::new(MIN_LATENCY_UNSET),
            max_latency_ns: AtomicU64::new(0),
        }
    }

    /// Records a response that arrived with a 2xx status.
    pub fn record_success(&self, latency: Duration) {
        self.record_latency(latency);
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.successful_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a response that arrived with a non-2xx status. The response
    /// exists, so its latency still counts.
    pub fn record_status_failure(&self, latency: Duration) {
        self.record_latency(latency);
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a request that never produced a response (connect failure,
    /// timeout, DNS error, or a request that could not be built). No latency
    /// is recorded.
    pub fn record_transport_failure(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn record_latency(&self, latency: Duration) {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.latency_sum_ns.fetch_add(nanos, Ordering::Relaxed);
        self.min_latency_ns.fetch_min(nanos, Ordering::Relaxed);
        self.max_latency_ns.fetch_max(nanos, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        let min_raw = self.min_latency_ns.load(Ordering::Relaxed);
        let min_latency_ns = (min_raw != MIN_LATENCY_UNSET).then_some(min_raw);
        let max_latency_ns = min_latency_ns
            .is_some()
            .then(|| self.max_latency_ns.load(Ordering::Relaxed));

        StatsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            latency_sum_ns: self.latency_sum_ns.load(Ordering::Relaxed),
            min_latency_ns,
            max_latency_ns,
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

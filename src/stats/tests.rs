use std::time::Duration;

use super::{RunStats, StatsSnapshot};
use crate::error::{AppError, AppResult};

#[test]
fn empty_stats_snapshot_is_zeroed() -> AppResult<()> {
    let stats = RunStats::new();
    let snapshot = stats.snapshot();

    if snapshot != StatsSnapshot::default() {
        return Err(AppError::validation(format!(
            "Unexpected empty snapshot: {snapshot:?}"
        )));
    }

    Ok(())
}

#[test]
fn outcomes_partition_the_total() -> AppResult<()> {
    let stats = RunStats::new();
    stats.record_success(Duration::from_millis(2));
    stats.record_success(Duration::from_millis(4));
    stats.record_status_failure(Duration::from_millis(6));
    stats.record_transport_failure();

    let snapshot = stats.snapshot();
    let checks = [
        (snapshot.total_requests == 4, "Unexpected total"),
        (snapshot.successful_requests == 2, "Unexpected successes"),
        (snapshot.failed_requests == 2, "Unexpected failures"),
        (
            snapshot.total_requests
                == snapshot
                    .successful_requests
                    .saturating_add(snapshot.failed_requests),
            "Total must equal successes plus failures",
        ),
        (
            snapshot.latency_sum_ns == 12_000_000,
            "Unexpected latency sum",
        ),
        (
            snapshot.min_latency_ns == Some(2_000_000),
            "Unexpected min latency",
        ),
        (
            snapshot.max_latency_ns == Some(6_000_000),
            "Unexpected max latency",
        ),
    ];

    for (ok, msg) in checks {
        if !ok {
            return Err(AppError::validation(msg));
        }
    }

    Ok(())
}

#[test]
fn transport_failures_leave_latency_untouched() -> AppResult<()> {
    let stats = RunStats::new();
    stats.record_transport_failure();
    stats.record_transport_failure();

    let snapshot = stats.snapshot();
    let checks = [
        (snapshot.total_requests == 2, "Unexpected total"),
        (snapshot.failed_requests == 2, "Unexpected failures"),
        (snapshot.latency_sum_ns == 0, "Expected zero latency sum"),
        (
            snapshot.min_latency_ns.is_none(),
            "Expected no min latency sample",
        ),
        (
            snapshot.max_latency_ns.is_none(),
            "Expected no max latency sample",
        ),
    ];

    for (ok, msg) in checks {
        if !ok {
            return Err(AppError::validation(msg));
        }
    }

    Ok(())
}

#[test]
fn concurrent_updates_lose_nothing() -> AppResult<()> {
    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 1_000;

    let stats = RunStats::new();

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..PER_THREAD {
                    stats.record_success(Duration::from_micros(10));
                    stats.record_status_failure(Duration::from_micros(30));
                    stats.record_transport_failure();
                }
            });
        }
    });

    let per_kind = THREADS
        .checked_mul(PER_THREAD)
        .ok_or_else(|| AppError::validation("Count overflow"))?;
    let expected_total = per_kind
        .checked_mul(3)
        .ok_or_else(|| AppError::validation("Total overflow"))?;
    let expected_failed = per_kind
        .checked_mul(2)
        .ok_or_else(|| AppError::validation("Failed overflow"))?;
    let expected_latency = per_kind
        .checked_mul(40_000)
        .ok_or_else(|| AppError::validation("Latency overflow"))?;

    let snapshot = stats.snapshot();
    let checks = [
        (
            snapshot.total_requests == expected_total,
            "Unexpected total",
        ),
        (
            snapshot.successful_requests == per_kind,
            "Unexpected successes",
        ),
        (
            snapshot.failed_requests == expected_failed,
            "Unexpected failures",
        ),
        (
            snapshot.latency_sum_ns == expected_latency,
            "Unexpected latency sum",
        ),
        (
            snapshot.min_latency_ns == Some(10_000),
            "Unexpected min latency",
        ),
        (
            snapshot.max_latency_ns == Some(30_000),
            "Unexpected max latency",
        ),
    ];

    for (ok, msg) in checks {
        if !ok {
            return Err(AppError::validation(msg));
        }
    }

    Ok(())
}

use std::time::Duration;

use crate::args::{DriverArgs, RunMode};
use crate::http::RunReport;
use crate::stats::StatsSnapshot;

/// Rates kept as integers scaled by 100 so two decimal places survive
/// without floating point.
pub(super) struct SummaryStats {
    pub(super) success_rate_x100: u64,
    pub(super) failure_rate_x100: u64,
    pub(super) avg_rps_x100: u64,
    pub(super) avg_latency_ns: u64,
}

pub(super) fn compute_summary_stats(snapshot: &StatsSnapshot, elapsed: Duration) -> SummaryStats {
    let duration_ms = elapsed.as_millis().max(1);
    let total = snapshot.total_requests;

    let avg_rps_x100 = if total > 0 {
        let scaled = u128::from(total)
            .saturating_mul(100_000)
            .checked_div(duration_ms)
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    } else {
        0
    };

    // Failures that produced a response still carry latency, so the average
    // divides by the full total rather than the success count.
    let avg_latency_ns = snapshot.latency_sum_ns.checked_div(total).unwrap_or(0);

    SummaryStats {
        success_rate_x100: percent_x100(snapshot.successful_requests, total),
        failure_rate_x100: percent_x100(snapshot.failed_requests, total),
        avg_rps_x100,
        avg_latency_ns,
    }
}

fn percent_x100(part: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let scaled = u128::from(part)
        .saturating_mul(10_000)
        .checked_div(u128::from(total))
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Prints the settings block shown before the first request goes out.
pub(crate) fn print_run_header(args: &DriverArgs) {
    println!("Target:     {} {}", args.method.as_str(), args.url);
    println!("Workers:    {}", args.concurrency);
    match args.run_mode() {
        RunMode::Count(total) => println!("Mode:       count ({} requests)", total),
        RunMode::Timed(window) => println!("Mode:       timed ({}s window)", window.as_secs()),
    }
    println!("Timeout:    {}", format_timeout(args.timeout));
    println!(
        "Keep-Alive: {}",
        if args.keep_alive() { "on" } else { "off" }
    );
    println!();
}

/// Prints the end-of-run results block. Rate and latency lines only appear
/// when at least one request was issued, so an empty run cannot divide by
/// zero or report a meaningless average.
pub(crate) fn print_summary(report: &RunReport) {
    let stats = compute_summary_stats(&report.snapshot, report.elapsed);
    let snapshot = &report.snapshot;
    let elapsed_ms = report.elapsed.as_millis();

    println!();
    println!("===== Load Test Results =====");
    println!("Total Requests: {}", snapshot.total_requests);
    println!(
        "Successful: {} ({}.{:02}%)",
        snapshot.successful_requests,
        stats.success_rate_x100 / 100,
        stats.success_rate_x100 % 100
    );
    println!(
        "Failed: {} ({}.{:02}%)",
        snapshot.failed_requests,
        stats.failure_rate_x100 / 100,
        stats.failure_rate_x100 % 100
    );
    println!(
        "Duration: {}.{:02}s",
        elapsed_ms / 1000,
        (elapsed_ms % 1000) / 10
    );

    if snapshot.total_requests > 0 {
        println!(
            "Avg RPS: {}.{:02}",
            stats.avg_rps_x100 / 100,
            stats.avg_rps_x100 % 100
        );
        println!("Avg Latency: {}", format_latency(stats.avg_latency_ns));
        if let (Some(min), Some(max)) = (snapshot.min_latency_ns, snapshot.max_latency_ns) {
            println!(
                "Min/Max Latency: {} / {}",
                format_latency(min),
                format_latency(max)
            );
        }
    }
}

/// Renders a latency in the most readable unit: whole nanoseconds or
/// microseconds below a millisecond, hundredths of milliseconds above.
pub(super) fn format_latency(ns: u64) -> String {
    if ns < 1_000 {
        format!("{}ns", ns)
    } else if ns < 1_000_000 {
        format!("{}µs", ns / 1_000)
    } else {
        format!("{}.{:02}ms", ns / 1_000_000, (ns % 1_000_000) / 10_000)
    }
}

fn format_timeout(timeout: Duration) -> String {
    let ms = timeout.as_millis();
    if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{}ms", ms)
    }
}

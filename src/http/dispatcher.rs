use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

use crate::args::{DriverArgs, RunMode};
use crate::error::AppResult;
use crate::shutdown::{StopSender, spawn_signal_stop_handler, stop_channel};
use crate::stats::{RunStats, StatsSnapshot};

use super::client::{build_client, parse_target_url};
use super::worker::{WorkerContext, run_counted_worker, run_timed_worker};

/// Final accounting for a completed run, taken after every worker joined.
#[derive(Debug)]
pub struct RunReport {
    pub snapshot: StatsSnapshot,
    pub elapsed: Duration,
    pub mode: RunMode,
}

/// Splits `total` requests across `workers` tasks so the quotas sum back to
/// exactly `total` and no two quotas differ by more than one. The first
/// `total % workers` tasks carry the remainder.
#[must_use]
pub fn partition_requests(total: u64, workers: usize) -> Vec<u64> {
    let Some(worker_count) = u64::try_from(workers).ok().filter(|&count| count > 0) else {
        return Vec::new();
    };
    let base = total.checked_div(worker_count).unwrap_or(0);
    let remainder = total.checked_rem(worker_count).unwrap_or(0);

    (0..worker_count)
        .map(|index| {
            if index < remainder {
                base.saturating_add(1)
            } else {
                base
            }
        })
        .collect()
}

/// Drives a complete run: validates the target URL, builds the shared
/// client, spawns the worker pool, and joins it. Once the last worker has
/// joined, `done_tx` fires so the progress reporter can settle before the
/// caller prints the summary.
///
/// # Errors
///
/// Returns an error when the target URL is invalid, the client cannot be
/// built, or a spawned task panics.
pub async fn run_load_test(
    args: &DriverArgs,
    stats: &Arc<RunStats>,
    done_tx: &StopSender,
) -> AppResult<RunReport> {
    let url = parse_target_url(&args.url)?;
    let client = build_client(args)?;
    let mode = args.run_mode();

    debug!(
        "Dispatching {} mode run against {} with {} workers",
        mode.describe(),
        url,
        args.concurrency
    );

    let run_start = Instant::now();
    match mode {
        RunMode::Count(total) => run_counted(args, &client, &url, stats, total).await?,
        RunMode::Timed(window) => run_timed(args, &client, &url, stats, window).await?,
    }
    let elapsed = run_start.elapsed();

    drop(done_tx.send(()));

    Ok(RunReport {
        snapshot: stats.snapshot(),
        elapsed,
        mode,
    })
}

/// Count mode: every worker gets a fixed quota up front, so the run issues
/// exactly the requested number of requests with no coordination traffic.
async fn run_counted(
    args: &DriverArgs,
    client: &Client,
    url: &Url,
    stats: &Arc<RunStats>,
    total: u64,
) -> AppResult<()> {
    let handles: Vec<JoinHandle<()>> = partition_requests(total, args.concurrency)
        .into_iter()
        .map(|quota| {
            let ctx = worker_context(args, client, url, stats);
            tokio::spawn(async move { run_counted_worker(&ctx, quota).await })
        })
        .collect();

    join_workers(handles).await
}

/// Timed mode: workers run until the stop channel fires, fed by a window
/// timer and by Ctrl+C / SIGTERM.
async fn run_timed(
    args: &DriverArgs,
    client: &Client,
    url: &Url,
    stats: &Arc<RunStats>,
    window: Duration,
) -> AppResult<()> {
    let (stop_tx, _keepalive_rx) = stop_channel();
    let signal_handle = spawn_signal_stop_handler(&stop_tx);
    let timer_handle = spawn_stop_timer(&stop_tx, window);

    // Worker subscriptions are taken before any stop can be sent, so even a
    // zero-length window deterministically produces an empty run.
    let receivers: Vec<_> = (0..args.concurrency)
        .map(|_| stop_tx.subscribe())
        .collect();
    if window.is_zero() {
        drop(stop_tx.send(()));
    }

    let handles: Vec<JoinHandle<()>> = receivers
        .into_iter()
        .map(|stop_rx| {
            let ctx = worker_context(args, client, url, stats);
            tokio::spawn(async move { run_timed_worker(&ctx, stop_rx).await })
        })
        .collect();

    join_workers(handles).await?;

    // Wake the timer and signal tasks in case the run ended before the
    // window elapsed, then reap them.
    drop(stop_tx.send(()));
    timer_handle.await?;
    signal_handle.await?;
    Ok(())
}

/// Sends a stop once `window` has elapsed, unless one arrives first.
fn spawn_stop_timer(stop_tx: &StopSender, window: Duration) -> JoinHandle<()> {
    let stop_tx = stop_tx.clone();
    let mut stop_rx = stop_tx.subscribe();
    tokio::spawn(async move {
        tokio::select! {
            _ = stop_rx.recv() => {}
            () = tokio::time::sleep(window) => {
                drop(stop_tx.send(()));
            }
        }
    })
}

fn worker_context(
    args: &DriverArgs,
    client: &Client,
    url: &Url,
    stats: &Arc<RunStats>,
) -> WorkerContext {
    WorkerContext {
        client: client.clone(),
        url: url.clone(),
        method: args.method,
        stats: Arc::clone(stats),
    }
}

async fn join_workers(handles: Vec<JoinHandle<()>>) -> AppResult<()> {
    for handle in handles {
        handle.await?;
    }
    Ok(())
}

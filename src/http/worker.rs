use std::sync::Arc;
use std::time::Instant;

use futures_util::StreamExt;
use reqwest::{Client, Request, Response};
use tokio::sync::broadcast::error::TryRecvError;
use tracing::debug;
use url::Url;

use crate::args::HttpMethod;
use crate::shutdown::StopReceiver;
use crate::stats::RunStats;

/// Everything a single worker needs to issue requests.
pub(super) struct WorkerContext {
    pub(super) client: Client,
    pub(super) url: Url,
    pub(super) method: HttpMethod,
    pub(super) stats: Arc<RunStats>,
}

/// Issues exactly `quota` requests and returns.
pub(super) async fn run_counted_worker(ctx: &WorkerContext, quota: u64) {
    for _ in 0..quota {
        send_one(ctx).await;
    }
}

/// Issues requests back to back until the stop channel fires.
///
/// The channel is polled between requests rather than raced against the
/// in-flight one, so a request that already started is allowed to finish
/// and be recorded.
pub(super) async fn run_timed_worker(ctx: &WorkerContext, mut stop_rx: StopReceiver) {
    loop {
        match stop_rx.try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(()) | Err(TryRecvError::Closed | TryRecvError::Lagged(_)) => break,
        }
        send_one(ctx).await;
    }
}

/// Runs one full request cycle and records the outcome.
///
/// Latency covers send through body drain. Only responses that actually
/// arrived are classified by status; requests that never completed count
/// as failures without touching the latency accumulators.
async fn send_one(ctx: &WorkerContext) {
    let started = Instant::now();

    let request = match build_request(ctx) {
        Ok(request) => request,
        Err(err) => {
            debug!("Failed to build request: {}", err);
            ctx.stats.record_transport_failure();
            return;
        }
    };

    match ctx.client.execute(request).await {
        Ok(response) => {
            let status = response.status();
            match drain_response_body(response).await {
                Ok(_) => {
                    let latency = started.elapsed();
                    if status.is_success() {
                        ctx.stats.record_success(latency);
                    } else {
                        ctx.stats.record_status_failure(latency);
                    }
                }
                Err(err) => {
                    debug!("Failed to read response body: {}", err);
                    ctx.stats.record_transport_failure();
                }
            }
        }
        Err(err) => {
            if err.is_timeout() {
                debug!("Request timed out: {}", err);
            } else {
                debug!("Request failed: {}", err);
            }
            ctx.stats.record_transport_failure();
        }
    }
}

fn build_request(ctx: &WorkerContext) -> Result<Request, reqwest::Error> {
    let builder = match ctx.method {
        HttpMethod::Get => ctx.client.get(ctx.url.clone()),
        HttpMethod::Post => ctx.client.post(ctx.url.clone()),
        HttpMethod::Patch => ctx.client.patch(ctx.url.clone()),
        HttpMethod::Put => ctx.client.put(ctx.url.clone()),
        HttpMethod::Delete => ctx.client.delete(ctx.url.clone()),
    };
    builder.build()
}

/// Reads the response body to completion so the connection can go back to
/// the pool, returning how many bytes were discarded.
async fn drain_response_body(response: Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut drained: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        drained = drained.saturating_add(chunk.len() as u64);
    }
    Ok(drained)
}

//! Route handlers for the practice target.
//!
//! Exact-match routing on `(method, path)`. Every request except a GET of
//! `/stats` bumps the request counter; every failure reply also bumps the
//! error counter, so `/stats` gives load tests a signal for typoed URLs
//! and flaky endpoints alike.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::{Rng, RngCore};
use serde::Serialize;
use serde_json::json;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::http1::{ParsedRequest, parse_http1_request, write_error_response, write_json_response};
use super::state::{ConnectionGuard, TargetState, memory_usage_mb};

const CPU_BURN_ITERATIONS: u64 = 1_000_000;
const SLOW_DELAY_MS: std::ops::Range<u64> = 100..500;
const MEMORY_BUFFER_BYTES: usize = 10 * 1024 * 1024;
const ERROR_PERCENT: u32 = 30;
const LARGE_ITEM_COUNT: usize = 1000;

/// Success bodies share one shape; `data` is omitted when a handler has
/// nothing beyond the message to report.
#[derive(Serialize)]
struct Reply<D: Serialize> {
    message: &'static str,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<D>,
}

impl Reply<()> {
    fn bare(message: &'static str) -> Self {
        Self {
            message,
            timestamp: Utc::now().to_rfc3339(),
            data: None,
        }
    }
}

impl<D: Serialize> Reply<D> {
    fn with_data(message: &'static str, data: D) -> Self {
        Self {
            message,
            timestamp: Utc::now().to_rfc3339(),
            data: Some(data),
        }
    }
}

/// Serves requests on one connection until the peer closes it, asks to
/// close it, or the socket fails.
pub(super) async fn serve_connection<S>(mut stream: S, state: Arc<TargetState>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let _guard = ConnectionGuard::acquire(&state);
    loop {
        let request = match parse_http1_request(&mut stream).await {
            Ok(Some(request)) => request,
            Ok(None) => break,
            Err(rejection) => {
                state.record_request();
                state.record_error();
                if write_error_response(&mut stream, rejection.status, &rejection.message, false)
                    .await
                    .is_err()
                {
                    // Peer already hung up.
                }
                break;
            }
        };
        let keep_alive = request.keep_alive();
        if dispatch(&request, &state, &mut stream, keep_alive)
            .await
            .is_err()
        {
            break;
        }
        if !keep_alive {
            break;
        }
    }
}

async fn dispatch<W>(
    request: &ParsedRequest,
    state: &TargetState,
    socket: &mut W,
    keep_alive: bool,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    debug!("{} {}", request.method, request.path);

    // A GET of /stats reads the counters without moving them.
    if !(request.method == "GET" && request.path == "/stats") {
        state.record_request();
    }

    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/") => index(socket, keep_alive).await,
        ("GET", "/health") => {
            write_json_response(socket, 200, &Reply::bare("OK"), keep_alive).await
        }
        ("GET", "/cpu") => cpu_burn(socket, keep_alive).await,
        ("GET", "/slow") => slow(socket, keep_alive).await,
        ("GET", "/memory") => memory(socket, keep_alive).await,
        ("POST", "/json") => json_echo(request, state, socket, keep_alive).await,
        (_, "/json") => {
            state.record_error();
            write_error_response(socket, 405, "Method not allowed", keep_alive).await
        }
        ("GET", "/error") => flaky(state, socket, keep_alive).await,
        ("GET", "/stats") => stats_report(state, socket, keep_alive).await,
        ("GET", "/large") => large(socket, keep_alive).await,
        _ => {
            state.record_error();
            write_error_response(socket, 404, "Not found", keep_alive).await
        }
    }
}

async fn index<W>(socket: &mut W, keep_alive: bool) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let reply = Reply::with_data(
        "Load test target is running",
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": "/health, /cpu, /slow, /memory, /json, /error, /stats, /large",
        }),
    );
    write_json_response(socket, 200, &reply, keep_alive).await
}

async fn cpu_burn<W>(socket: &mut W, keep_alive: bool) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut result: u64 = 0;
    for step in 0..CPU_BURN_ITERATIONS {
        result = result.wrapping_add(std::hint::black_box(step));
    }
    let reply = Reply::with_data("CPU intensive task completed", json!({ "result": result }));
    write_json_response(socket, 200, &reply, keep_alive).await
}

async fn slow<W>(socket: &mut W, keep_alive: bool) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let delay_ms: u64 = rand::thread_rng().gen_range(SLOW_DELAY_MS);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    let reply = Reply::with_data("Slow response completed", json!({ "delay_ms": delay_ms }));
    write_json_response(socket, 200, &reply, keep_alive).await
}

async fn memory<W>(socket: &mut W, keep_alive: bool) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0_u8; MEMORY_BUFFER_BYTES];
    rand::thread_rng().fill_bytes(&mut buffer);
    // The checksum keeps the fill from being optimized away.
    let checksum = buffer
        .iter()
        .fold(0_u64, |acc, byte| acc.wrapping_add(u64::from(*byte)));
    let reply = Reply::with_data(
        "Memory intensive task completed",
        json!({ "bytes_allocated": buffer.len(), "checksum": checksum }),
    );
    write_json_response(socket, 200, &reply, keep_alive).await
}

async fn json_echo<W>(
    request: &ParsedRequest,
    state: &TargetState,
    socket: &mut W,
    keep_alive: bool,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    match serde_json::from_slice::<serde_json::Value>(&request.body) {
        Ok(payload) => {
            let reply = Reply::with_data("JSON received", payload);
            write_json_response(socket, 200, &reply, keep_alive).await
        }
        Err(err) => {
            debug!("Rejecting JSON payload: {}", err);
            state.record_error();
            write_error_response(socket, 400, "Invalid JSON", keep_alive).await
        }
    }
}

async fn flaky<W>(state: &TargetState, socket: &mut W, keep_alive: bool) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if rand::thread_rng().gen_range(0..100) < ERROR_PERCENT {
        state.record_error();
        write_error_response(socket, 500, "Random error occurred", keep_alive).await
    } else {
        write_json_response(socket, 200, &Reply::bare("Success"), keep_alive).await
    }
}

async fn stats_report<W>(
    state: &TargetState,
    socket: &mut W,
    keep_alive: bool,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    #[derive(Serialize)]
    struct StatsReply {
        total_requests: u64,
        total_errors: u64,
        active_connections: u64,
        memory_usage_mb: u64,
        uptime: String,
    }

    let snapshot = state.snapshot();
    let reply = StatsReply {
        total_requests: snapshot.total_requests,
        total_errors: snapshot.total_errors,
        active_connections: snapshot.active_connections,
        memory_usage_mb: memory_usage_mb(),
        uptime: format!("{}s", snapshot.uptime_secs),
    };
    write_json_response(socket, 200, &reply, keep_alive).await
}

async fn large<W>(socket: &mut W, keep_alive: bool) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    #[derive(Serialize)]
    struct LargeItem {
        id: usize,
        name: String,
        value: u64,
        timestamp: String,
        data: String,
    }

    let items: Vec<LargeItem> = {
        let mut rng = rand::thread_rng();
        (0..LARGE_ITEM_COUNT)
            .map(|id| LargeItem {
                id,
                name: format!("Item {id}"),
                value: rng.gen_range(0..1000),
                timestamp: Utc::now().to_rfc3339(),
                data: format!("Data string {id} with some padding to increase size"),
            })
            .collect()
    };
    let reply = Reply::with_data("Large response", items);
    write_json_response(socket, 200, &reply, keep_alive).await
}

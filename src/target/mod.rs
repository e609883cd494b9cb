//! Synthetic HTTP practice target, served by the `volley-target` binary.
//!
//! Hand-rolled HTTP/1.1 over a `tokio` listener: one accept task, one task
//! per connection, persistent connections unless the peer sends
//! `Connection: close`. Endpoints cover fast, slow, CPU-bound, memory-bound,
//! flaky, and large-payload behavior so a driver run has something
//! interesting to measure.

mod handlers;
mod http1;
mod state;


pub use http1::{HttpRejection, ParsedRequest, parse_http1_request};

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use tokio::net::TcpListener;
use tracing::info;

use crate::args::TargetArgs;
use crate::error::{AppResult, TargetError};
use state::TargetState;

/// Runs the practice target from CLI arguments until the process is killed.
///
/// # Errors
/// Returns an error when arguments are invalid, the runtime cannot start,
/// or the listen address cannot be bound.
pub fn run() -> AppResult<()> {
    let matches = TargetArgs::command().get_matches();
    let args = TargetArgs::from_arg_matches(&matches)?;

    crate::system::logger::init_logging(args.verbose, args.no_color);

    if !args.no_banner {
        crate::system::banner::print_cli_banner("practice target", args.no_color);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(&args))
}

async fn run_async(args: &TargetArgs) -> AppResult<()> {
    let server = TargetServer::bind(&args.listen).await?;
    info!("Practice target bound on {}", server.addr());

    // Scripts and tests parse this line to discover the ephemeral port a
    // `--listen ...:0` bind resolved to.
    println!("listening on http://{}", server.addr());
    print_endpoints();

    server.serve_forever().await
}

fn print_endpoints() {
    println!("Available endpoints:");
    println!("  GET  /health  - Quick health check");
    println!("  GET  /cpu     - CPU intensive task");
    println!("  GET  /slow    - Slow response (100-500ms)");
    println!("  GET  /memory  - Memory intensive task");
    println!("  POST /json    - JSON parsing test");
    println!("  GET  /error   - Random error (30% failure rate)");
    println!("  GET  /stats   - Server statistics");
    println!("  GET  /large   - Large response (~1000 item JSON)");
}

/// A bound practice target: resolved address, shared counters, and the
/// accept task feeding per-connection handlers.
///
/// Dropping the server aborts the accept task, so a test can bind on an
/// ephemeral port and let the listener die with the handle.
pub struct TargetServer {
    addr: SocketAddr,
    state: Arc<TargetState>,
    accept_task: tokio::task::JoinHandle<()>,
}

impl TargetServer {
    /// Binds the listener and starts accepting connections immediately.
    ///
    /// # Errors
    /// Returns an error when the address cannot be bound or the bound
    /// address cannot be read back.
    pub async fn bind(listen: &str) -> AppResult<Self> {
        let listener = TcpListener::bind(listen)
            .await
            .map_err(|source| TargetError::Bind {
                addr: listen.to_owned(),
                source,
            })?;
        let addr = listener
            .local_addr()
            .map_err(|source| TargetError::LocalAddr { source })?;
        let state = Arc::new(TargetState::new());
        let accept_state = Arc::clone(&state);
        let accept_task = tokio::spawn(accept_connections(listener, accept_state));
        Ok(Self {
            addr,
            state,
            accept_task,
        })
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub(crate) fn state(&self) -> &TargetState {
        &self.state
    }

    /// Parks on the accept task, which runs until the process exits.
    ///
    /// # Errors
    /// Returns an error when the accept task panics or is aborted.
    pub async fn serve_forever(mut self) -> AppResult<()> {
        (&mut self.accept_task).await?;
        Ok(())
    }
}

impl Drop for TargetServer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

async fn accept_connections(listener: TcpListener, state: Arc<TargetState>) {
    loop {
        let (stream, _) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                eprintln!("Failed to accept connection: {}", err);
                continue;
            }
        };
        let conn_state = Arc::clone(&state);
        tokio::spawn(async move {
            handlers::serve_connection(stream, conn_state).await;
        });
    }
}

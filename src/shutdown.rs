//! Cooperative stop signaling for timed runs.
//!
//! Workers poll the stop channel between requests instead of being aborted,
//! so an in-flight request always finishes before its worker exits.

use tokio::sync::broadcast;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

pub type StopSender = broadcast::Sender<()>;
pub type StopReceiver = broadcast::Receiver<()>;

/// Broadcast channel size for stop notifications (single signal fan-out).
const STOP_CHANNEL_CAPACITY: usize = 1;

#[must_use]
pub fn stop_channel() -> (StopSender, StopReceiver) {
    broadcast::channel::<()>(STOP_CHANNEL_CAPACITY)
}

/// Forwards Ctrl+C (and SIGTERM on unix) into the stop channel so a timed run
/// can end early with a summary instead of dying mid-flight.
///
/// The subscription is taken before the task is spawned, so a stop sent any
/// time after this returns is guaranteed to terminate the handler.
pub fn spawn_signal_stop_handler(stop_tx: &StopSender) -> tokio::task::JoinHandle<()> {
    let stop_tx = stop_tx.clone();
    let mut stop_rx = stop_tx.subscribe();
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                eprintln!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                _ = stop_rx.recv() => {}
                _ = tokio::signal::ctrl_c() => {
                    drop(stop_tx.send(()));
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    drop(stop_tx.send(()));
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = stop_rx.recv() => {}
                _ = tokio::signal::ctrl_c() => {
                    drop(stop_tx.send(()));
                }
            }
        }
    })
}

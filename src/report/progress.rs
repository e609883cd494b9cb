use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::shutdown::StopSender;
use crate::stats::{RunStats, StatsSnapshot};

/// Cadence of the live progress line.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Spawns the once-a-second progress line task.
///
/// The task draws nothing when stderr is not a terminal, so piped output
/// stays clean. It subscribes to `done_tx` before spawning, renders a final
/// line with the finished totals when the signal arrives, and terminates
/// with a newline so the summary starts on a fresh line.
pub(crate) fn spawn_progress_reporter(
    stats: &Arc<RunStats>,
    done_tx: &StopSender,
    no_color: bool,
) -> tokio::task::JoinHandle<()> {
    let stats = Arc::clone(stats);
    let mut done_rx = done_tx.subscribe();

    tokio::spawn(async move {
        if !std::io::stderr().is_terminal() {
            return;
        }

        let mut ticker = tokio::time::interval(PROGRESS_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut last_total: u64 = 0;

        loop {
            tokio::select! {
                _ = done_rx.recv() => {
                    let snapshot = stats.snapshot();
                    let rate = snapshot.total_requests.saturating_sub(last_total);
                    drop(render_progress_line(&snapshot, rate, no_color));
                    drop(finish_progress_line());
                    break;
                }
                _ = ticker.tick() => {
                    let snapshot = stats.snapshot();
                    let rate = snapshot.total_requests.saturating_sub(last_total);
                    last_total = snapshot.total_requests;
                    if render_progress_line(&snapshot, rate, no_color).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

fn render_progress_line(
    snapshot: &StatsSnapshot,
    rate: u64,
    no_color: bool,
) -> Result<(), std::io::Error> {
    let line = build_progress_segments(snapshot, rate, no_color);

    let mut out = std::io::stderr();
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for segment in line {
        if no_color {
            queue!(out, Print(&segment.text))?;
        } else if let Some(color) = segment.color {
            queue!(
                out,
                SetForegroundColor(color),
                Print(&segment.text),
                ResetColor
            )?;
        } else {
            queue!(out, Print(&segment.text))?;
        }
    }
    out.flush()?;
    Ok(())
}

fn finish_progress_line() -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Builds the progress line. `rate` is the number of requests completed
/// since the previous tick, which over a one second cadence reads directly
/// as requests per second.
pub(super) fn build_progress_segments(
    snapshot: &StatsSnapshot,
    rate: u64,
    no_color: bool,
) -> Vec<ProgressSegment> {
    let counts_text = format!(
        "Requests: {} | Success: {}",
        snapshot.total_requests, snapshot.successful_requests
    );
    let failed_text = format!(" | Failed: {}", snapshot.failed_requests);
    let rate_text = format!(" | RPS: {}", rate);

    if no_color {
        vec![
            ProgressSegment::plain(counts_text),
            ProgressSegment::plain(failed_text),
            ProgressSegment::plain(rate_text),
        ]
    } else {
        // Failures stay uncolored until one actually happens, so a clean
        // run renders without any red.
        let failed_segment = if snapshot.failed_requests > 0 {
            ProgressSegment::colored(failed_text, Color::Red)
        } else {
            ProgressSegment::plain(failed_text)
        };

        vec![
            ProgressSegment::plain(counts_text),
            failed_segment,
            ProgressSegment::colored(rate_text, Color::Cyan),
        ]
    }
}

pub(super) struct ProgressSegment {
    pub(super) text: String,
    pub(super) color: Option<Color>,
}

impl ProgressSegment {
    const fn plain(text: String) -> Self {
        Self { text, color: None }
    }

    const fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }
}

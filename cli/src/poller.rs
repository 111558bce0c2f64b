//! Fixed-cadence poll task
//!
//! Drives the advancement/read cycle: on every tick the session announces
//! queued calls through the speech sink and advances its cursors. State
//! transitions are rendered to stdout; unchanged state prints nothing.

use std::time::Duration;

use stagecall_core::{Clock, SessionStatus};
use tokio::task::JoinHandle;
use tokio::time;

use crate::CliContext;

/// Spawn the poll task at the configured cadence.
pub async fn spawn_poller(ctx: &CliContext) -> JoinHandle<()> {
    // Floor the cadence so a bad config value can't spin the loop.
    let interval_ms = ctx.config.read().await.poll_interval_ms.max(10);
    let poll_ctx = ctx.clone();

    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_millis(interval_ms));
        let mut last_status = SessionStatus::Idle;
        let mut last_line = String::new();

        loop {
            interval.tick().await;

            let (status, announcement, queued_line, remaining_ms) = {
                let mut session = poll_ctx.session.write().await;
                let status = session.status();
                // Announce the previous tick's queue before advancing, the
                // same order the reference poller used.
                let announcement = match status {
                    SessionStatus::Running => {
                        let text = session.read_move();
                        session.check_moves();
                        text
                    }
                    _ => None,
                };
                (
                    status,
                    announcement,
                    session.queued_moves_string(),
                    session.clock().remaining_ms(),
                )
            };

            if let Some(text) = &announcement {
                poll_ctx.speech.say(text);
            }

            if status != last_status {
                match status {
                    SessionStatus::TimedOut => println!("TIME OUT!"),
                    SessionStatus::Complete => println!("Stage complete."),
                    _ => {}
                }
                last_status = status;
            }

            match queued_line {
                Some(line) if line != last_line => {
                    match remaining_ms {
                        Some(remaining) if remaining >= 0 => println!(
                            "[{}] Next move: {line}",
                            Clock::format_mmss(remaining as u64)
                        ),
                        _ => println!("Next move: {line}"),
                    }
                    last_line = line;
                }
                Some(_) => {}
                None => last_line.clear(),
            }
        }
    })
}

use std::io::Write;

use stagecall_core::{Clock, SessionStatus};

use crate::CliContext;

/// List the available stages, marking the selected one
pub async fn list_stages(ctx: &CliContext) {
    if ctx.registry.is_empty() {
        println!("No stages available");
        return;
    }

    let selected = ctx.session.read().await.stage().id.clone();

    println!("{:<8} {:<24} {:>8} {:>6}", "Id", "Name", "Length", "Moves");
    println!("{}", "-".repeat(50));

    for stage in ctx.registry.iter() {
        let marker = if stage.id == selected { "  *" } else { "" };
        println!(
            "{:<8} {:<24} {:>8} {:>6}{}",
            stage.id,
            stage.name,
            Clock::format_mmss(stage.stage_length().as_millis() as u64),
            stage.moves.len(),
            marker,
        );
    }
}

/// Select a stage by id. Always resets the session.
pub async fn select_stage(id: &str, ctx: &CliContext) {
    let Some(stage) = ctx.registry.get(id) else {
        println!("Unknown stage: {id}");
        return;
    };

    let mut session = ctx.session.write().await;
    session.set_stage(stage);
    println!("Selected {}", session.stage().name);
}

/// Primary action: start the stage clock, or call the break once running
pub async fn primary_action(ctx: &CliContext) {
    let mut session = ctx.session.write().await;
    match session.status() {
        SessionStatus::Idle => {
            session.user_action();
            println!("{} started. Good luck!", session.stage().name);
        }
        SessionStatus::Running => {
            session.user_action();
            if session.on_break() {
                println!("Break called.");
            }
        }
        SessionStatus::TimedOut => println!("TIME OUT! Reset to go again."),
        SessionStatus::Complete => println!("Stage complete. Reset to go again."),
    }
}

pub async fn reset(ctx: &CliContext) {
    ctx.session.write().await.reset();
    println!("Session reset.");
}

pub async fn toggle_mute(ctx: &CliContext) {
    let muted = ctx.session.write().await.toggle_mute();
    println!("Speech {}", if muted { "muted" } else { "unmuted" });
}

pub async fn show_status(ctx: &CliContext) {
    let session = ctx.session.read().await;
    println!("Stage: {}", session.stage().name);

    match session.status() {
        SessionStatus::Idle => {
            println!("Waiting to start. go: start clock | go (again): break | reset | mute");
        }
        SessionStatus::Running => {
            if let Some(remaining) = session.clock().remaining_ms() {
                println!("Remaining: {}", Clock::format_mmss(remaining.max(0) as u64));
            }
            if let Some(started) = session.started_at() {
                println!("Started at {}", started.format("%H:%M:%S"));
            }
            if session.on_break() {
                println!("On break");
            }
            match session.queued_moves_string() {
                Some(calls) => println!("Next move: {calls}"),
                None => println!("Next move: (none yet)"),
            }
        }
        SessionStatus::TimedOut => println!("TIME OUT!"),
        SessionStatus::Complete => println!("Stage complete."),
    }
}

pub fn exit() {
    write!(std::io::stdout(), "quitting...").ok();
    std::io::stdout().flush().ok();
}

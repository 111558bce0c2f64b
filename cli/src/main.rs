use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use stagecall_core::{NullSink, SpeechSink, StageRegistry, TimelineManager};

use stagecall_cli::config::AppConfig;
use stagecall_cli::speech::CommandSink;
use stagecall_cli::{commands, poller, readline, CliContext};

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::load();

    let mut registry = StageRegistry::built_in();
    if let Some(dir) = &config.stage_directory {
        match registry.extend_from_dir(Path::new(dir)) {
            Ok(count) if count > 0 => println!("Loaded {count} stage(s) from {dir}"),
            Ok(_) => {}
            Err(e) => println!("Warning: {e}"),
        }
    }

    let stage = registry
        .get(&config.default_stage)
        .or_else(|| registry.iter().next().cloned())
        .ok_or("no stage definitions available")?;
    let session = TimelineManager::new(stage);

    let speech: Arc<dyn SpeechSink> = if config.voice.enabled {
        match CommandSink::from_config(&config.speech_command, &config.voice) {
            Some(sink) => Arc::new(sink),
            None => {
                println!("Warning: invalid speech command, call-outs will not be spoken");
                Arc::new(NullSink)
            }
        }
    } else {
        Arc::new(NullSink)
    };

    let ctx = CliContext::new(config, registry, session, speech);

    // Start the advancement poller
    let handle = poller::spawn_poller(&ctx).await;
    ctx.tasks.lock().await.poller = Some(handle);

    commands::show_status(&ctx).await;

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                println!("{err}");
            }
        }
    }

    if let Some(handle) = ctx.tasks.lock().await.poller.take() {
        handle.abort();
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "stage call-out assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available stages
    Stages,
    /// Select a stage by id
    Select { id: String },
    /// Primary action: start the stage clock, or call the break
    Go,
    /// Reset the current session
    Reset,
    /// Toggle spoken call-outs
    Mute,
    /// Show session status
    Status,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "stagecall".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Stages) => commands::list_stages(ctx).await,
        Some(Commands::Select { id }) => commands::select_stage(id, ctx).await,
        Some(Commands::Go) => commands::primary_action(ctx).await,
        Some(Commands::Reset) => commands::reset(ctx).await,
        Some(Commands::Mute) => commands::toggle_mute(ctx).await,
        Some(Commands::Status) => commands::show_status(ctx).await,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}

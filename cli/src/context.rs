use std::sync::Arc;

use stagecall_core::{SpeechSink, StageRegistry, TimelineManager};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::config::AppConfig;

/// Background task handles owned by the CLI
#[derive(Default)]
pub struct BackgroundTasks {
    pub poller: Option<JoinHandle<()>>,
}

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the individual state types.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<AppConfig>>,
    pub registry: Arc<StageRegistry>,
    /// The active session; the poll task and REPL commands are the only
    /// writers.
    pub session: Arc<RwLock<TimelineManager>>,
    pub speech: Arc<dyn SpeechSink>,
    pub tasks: Arc<Mutex<BackgroundTasks>>,
}

impl CliContext {
    pub fn new(
        config: AppConfig,
        registry: StageRegistry,
        session: TimelineManager,
        speech: Arc<dyn SpeechSink>,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            registry: Arc::new(registry),
            session: Arc::new(RwLock::new(session)),
            speech,
            tasks: Arc::new(Mutex::new(BackgroundTasks::default())),
        }
    }
}

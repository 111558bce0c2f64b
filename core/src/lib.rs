pub mod clock;
pub mod session;
pub mod speech;
pub mod stage;

// Re-exports for convenience
pub use clock::{Clock, ClockState};
pub use session::{
    SessionStatus, TimelineManager, BREAK_GRACE_MS, MIN_GAP_MS, OFFSET_MS, POLL_INTERVAL_MS,
};
pub use speech::{join_calls, NullSink, SpeechSink, VoiceConfig};
pub use stage::{
    load_stages_from_dir, load_stages_from_file, load_stages_from_str, BreakEntry,
    BreakTimingRule, MoveDefinition, StageConfig, StageDefinition, StageError, StageRegistry,
};

//! Stage session state
//!
//! A session pairs a stage definition with the runtime cursors that drive
//! playback: the clock, the move cursor, the optional break cursor, and
//! the queued call-outs.

mod manager;


pub use manager::{
    SessionStatus, TimelineManager, BREAK_GRACE_MS, MIN_GAP_MS, OFFSET_MS, POLL_INTERVAL_MS,
};

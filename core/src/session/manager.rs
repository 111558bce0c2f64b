//! Timeline advancement engine
//!
//! A [`TimelineManager`] plays a stage's scripted timeline against its
//! clock. On every poll tick it advances a cursor over the move list
//! whenever elapsed time (plus a fixed look-ahead) has caught up with the
//! cumulative scheduled time, queueing the calls that fall due. A user
//! break call switches the cursor onto the break sub-timeline until that
//! runs out.
//!
//! # Lifecycle
//!
//! 1. Constructed over a stage definition, clock idle
//! 2. `user_action()` starts the clock; ticks advance the move cursor
//! 3. A second `user_action()` enters the break sub-timeline
//! 4. The cursor running off the end of the move list latches the
//!    complete state; `reset()` starts over

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::clock::{Clock, ClockState};
use crate::speech;
use crate::stage::StageDefinition;

/// Look-ahead applied to every advancement check so calls land slightly
/// before the move itself, leaving time for speech.
pub const OFFSET_MS: u64 = 1800;

/// Window for batching near-simultaneous moves into one announcement.
pub const MIN_GAP_MS: u64 = 2500;

/// Grace period after the last scheduled advancement; a break call inside
/// it does not consume the current move.
pub const BREAK_GRACE_MS: u64 = 2000;

/// Reference poll cadence for hosts driving `check_moves`.
pub const POLL_INTERVAL_MS: u64 = 50;

/// Session state as a renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Clock not started
    Idle,
    /// Clock running, timeline advancing
    Running,
    /// Clock ran past the stage length
    TimedOut,
    /// Every scheduled move has been consumed
    Complete,
}

/// Playback state for one stage session
///
/// All mutation happens synchronously inside the caller's poll or input
/// callbacks; the manager owns no tasks and never blocks.
#[derive(Debug)]
pub struct TimelineManager {
    stage: Arc<StageDefinition>,
    clock: Clock,

    /// Wall-clock time of the start call, for status display
    started_at: Option<DateTime<Local>>,

    /// Cursor into the stage's move list
    move_index: usize,

    /// Cursor into the break sub-timeline; `Some` iff on break
    break_index: Option<usize>,

    /// Cumulative scheduled time consumed so far, in ms. Monotonically
    /// non-decreasing within a run.
    counter_ms: u64,

    /// Per-session break segment durations; the last entry may be
    /// overridden by a timing rule without touching the shared definition
    break_durations_ms: Vec<u64>,

    queued: Vec<String>,

    /// Bumped on every queue rebuild; compared against `spoken_generation`
    /// to de-duplicate announcements across polls
    queue_generation: u64,
    spoken_generation: u64,

    mute: bool,
    complete: bool,
}

impl TimelineManager {
    pub fn new(stage: Arc<StageDefinition>) -> Self {
        Self {
            clock: Clock::new(stage.stage_length()),
            break_durations_ms: stage.break_durations_ms(),
            stage,
            started_at: None,
            move_index: 0,
            break_index: None,
            counter_ms: 0,
            queued: Vec::new(),
            queue_generation: 0,
            spoken_generation: 0,
            mute: false,
            complete: false,
        }
    }

    /// Reinitialize all mutable session state, keeping the stage reference.
    pub fn reset(&mut self) {
        self.clock = Clock::new(self.stage.stage_length());
        self.started_at = None;
        self.move_index = 0;
        self.break_index = None;
        self.counter_ms = 0;
        self.break_durations_ms = self.stage.break_durations_ms();
        self.queued.clear();
        self.queue_generation = 0;
        self.spoken_generation = 0;
        self.mute = false;
        self.complete = false;
    }

    /// Switch to a different stage. Always resets the session.
    pub fn set_stage(&mut self, stage: Arc<StageDefinition>) {
        self.stage = stage;
        self.reset();
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn stage(&self) -> &Arc<StageDefinition> {
        &self.stage
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn on_break(&self) -> bool {
        self.break_index.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Cumulative scheduled time consumed so far, in milliseconds
    pub fn counter_ms(&self) -> u64 {
        self.counter_ms
    }

    pub fn is_muted(&self) -> bool {
        self.mute
    }

    pub fn set_mute(&mut self, mute: bool) {
        self.mute = mute;
    }

    /// Flip the mute flag, returning the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.mute = !self.mute;
        self.mute
    }

    pub fn status(&self) -> SessionStatus {
        if self.complete {
            return SessionStatus::Complete;
        }
        match self.clock.state {
            ClockState::Idle => SessionStatus::Idle,
            ClockState::Active => {
                if self.clock.remaining_ms().is_some_and(|r| r < 0) {
                    SessionStatus::TimedOut
                } else {
                    SessionStatus::Running
                }
            }
        }
    }

    // ─── Input ──────────────────────────────────────────────────────────────

    /// Primary action: start the clock from idle, otherwise call the break.
    pub fn user_action(&mut self) {
        if self.complete {
            return;
        }
        match self.clock.state {
            ClockState::Idle => {
                self.clock.start();
                self.started_at = Some(Local::now());
                tracing::debug!(stage = %self.stage.id, "stage clock started");
            }
            ClockState::Active => self.start_break(),
        }
    }

    /// Enter the break sub-timeline at the current clock position.
    pub fn start_break(&mut self) {
        let (Some(elapsed), Some(remaining)) = (self.clock.elapsed_ms(), self.clock.remaining_ms())
        else {
            return;
        };
        self.start_break_at(elapsed, remaining);
    }

    /// Break entry with an explicit clock position. Exposed for hosts that
    /// drive the engine with their own elapsed values.
    pub fn start_break_at(&mut self, elapsed_ms: u64, remaining_ms: i64) {
        if self.complete || self.stage.break_timeline.is_empty() {
            return;
        }

        self.break_index = Some(0);

        // The final break segment's length depends on how early or late
        // the break call came.
        self.break_durations_ms = self.stage.break_durations_ms();
        if let Some(final_ms) = self.stage.final_break_ms(remaining_ms) {
            if let Some(last) = self.break_durations_ms.last_mut() {
                *last = final_ms;
            }
        }

        self.rebuild_queue();
        self.push_call(self.stage.break_timeline[0].label.clone());

        // Outside the grace window the break call consumes the current move.
        if elapsed_ms >= self.counter_ms + BREAK_GRACE_MS {
            self.move_index += 1;
        }
        while self
            .stage
            .moves
            .get(self.move_index)
            .is_some_and(|m| m.skip)
        {
            self.move_index += 1;
        }

        // New baseline for break-timeline scheduling.
        self.counter_ms = elapsed_ms;
        tracing::debug!(stage = %self.stage.id, elapsed_ms, remaining_ms, "break started");
    }

    // ─── Advancement ────────────────────────────────────────────────────────

    /// Advance the timeline against the session clock. Call on every poll
    /// tick; a no-op before the clock starts and after completion.
    pub fn check_moves(&mut self) {
        if let Some(elapsed) = self.clock.elapsed_ms() {
            self.advance(elapsed);
        }
    }

    /// Advancement step against an explicit elapsed time in milliseconds.
    /// Safe to call at any cadence.
    pub fn advance(&mut self, elapsed_ms: u64) {
        if self.complete {
            return;
        }
        match self.break_index {
            Some(index) => self.advance_break(elapsed_ms, index),
            None => self.advance_moves(elapsed_ms),
        }
    }

    fn advance_moves(&mut self, elapsed_ms: u64) {
        let Some(current_ms) = self.move_duration_ms(self.move_index) else {
            self.finish();
            return;
        };
        if elapsed_ms + OFFSET_MS < self.counter_ms + current_ms {
            return;
        }

        self.rebuild_queue();
        self.counter_ms += current_ms;
        if !self.step_to_next_call() {
            return;
        }
        self.queue_current_move();

        // Batch any moves landing within MIN_GAP of the one just queued so
        // near-simultaneous calls go out as a single announcement.
        while let Some(next_ms) = self.move_duration_ms(self.move_index) {
            if elapsed_ms + OFFSET_MS + MIN_GAP_MS < self.counter_ms + next_ms {
                break;
            }
            self.counter_ms += next_ms;
            if !self.step_to_next_call() {
                return;
            }
            self.queue_current_move();
        }
    }

    fn advance_break(&mut self, elapsed_ms: u64, start_index: usize) {
        let mut index = start_index;
        let Some(&current_ms) = self.break_durations_ms.get(index) else {
            self.break_index = None;
            return;
        };
        if elapsed_ms + OFFSET_MS < self.counter_ms + current_ms {
            return;
        }

        self.rebuild_queue();
        self.counter_ms += current_ms;

        if index + 1 >= self.break_durations_ms.len() {
            self.leave_break();
            return;
        }

        index += 1;
        self.break_index = Some(index);
        self.push_call(self.stage.break_timeline[index].label.clone());

        while let Some(&next_ms) = self.break_durations_ms.get(index) {
            if elapsed_ms + OFFSET_MS + MIN_GAP_MS < self.counter_ms + next_ms {
                break;
            }
            self.counter_ms += next_ms;
            if index + 1 >= self.break_durations_ms.len() {
                self.leave_break();
                return;
            }
            index += 1;
            self.break_index = Some(index);
            self.push_call(self.stage.break_timeline[index].label.clone());
        }
    }

    /// Exit the break sub-timeline and queue the upcoming main move.
    fn leave_break(&mut self) {
        self.break_index = None;
        if self.stage.moves.get(self.move_index).is_some() {
            self.queue_current_move();
        } else {
            self.finish();
        }
    }

    /// Step the cursor to the next announceable move, consuming the
    /// durations of skip-flagged entries so the schedule stays aligned.
    /// Returns false when the timeline is exhausted.
    fn step_to_next_call(&mut self) -> bool {
        loop {
            self.move_index += 1;
            match self.stage.moves.get(self.move_index) {
                None => {
                    self.finish();
                    return false;
                }
                Some(m) if m.skip => {
                    self.counter_ms += m.duration_ms();
                }
                Some(_) => return true,
            }
        }
    }

    fn queue_current_move(&mut self) {
        if let Some(m) = self.stage.moves.get(self.move_index) {
            self.push_call(m.label.clone());
        }
    }

    /// Latch the terminal state: every scheduled move has been consumed.
    /// Calls queued by the advancement that ran off the end stay queued so
    /// they are still announced.
    fn finish(&mut self) {
        if !self.complete {
            self.complete = true;
            self.break_index = None;
            tracing::debug!(stage = %self.stage.id, "stage timeline complete");
        }
    }

    // ─── Queue & Announcements ──────────────────────────────────────────────

    /// Clear the queue and bump the generation. Every advancement that
    /// changes the queue goes through here so announcements re-fire.
    fn rebuild_queue(&mut self) {
        self.queued.clear();
        self.queue_generation += 1;
    }

    fn push_call(&mut self, label: String) {
        self.queued.push(label);
    }

    /// Moves currently due within the look-ahead window
    pub fn queued_moves(&self) -> &[String] {
        &self.queued
    }

    /// Joined announcement text, `None` while nothing is queued
    pub fn queued_moves_string(&self) -> Option<String> {
        if self.queued.is_empty() {
            None
        } else {
            Some(speech::join_calls(&self.queued))
        }
    }

    /// Return the announcement due for speech, if the queue changed since
    /// the last read. The generation is recorded even while muted so
    /// unmuting does not replay stale calls.
    pub fn read_move(&mut self) -> Option<String> {
        if self.queued.is_empty() || self.queue_generation == self.spoken_generation {
            return None;
        }
        self.spoken_generation = self.queue_generation;
        if self.mute {
            return None;
        }
        self.queued_moves_string()
    }

    fn move_duration_ms(&self, index: usize) -> Option<u64> {
        self.stage.moves.get(index).map(|m| m.duration_ms())
    }
}

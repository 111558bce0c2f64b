//! Stage clock
//!
//! Tracks wall-clock time against a fixed stage length. The clock is a
//! one-way state machine: `Idle` until `start()` is called, then `Active`
//! for the rest of the run. A full session reset constructs a new clock
//! rather than rewinding this one.

use std::time::{Duration, Instant};

/// Clock run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    #[default]
    Idle,
    Active,
}

/// Wall-clock tracker for a single stage run
#[derive(Debug, Clone)]
pub struct Clock {
    /// Current run state
    pub state: ClockState,

    /// Instant `start()` was called (None while idle)
    pub started: Option<Instant>,

    /// Fixed total duration of the stage
    pub stage_length: Duration,
}

impl Clock {
    pub fn new(stage_length: Duration) -> Self {
        Self {
            state: ClockState::Idle,
            started: None,
            stage_length,
        }
    }

    /// Transition Idle → Active and record the start instant.
    ///
    /// Calling this twice re-anchors the clock; callers guard on `state`.
    pub fn start(&mut self) {
        self.state = ClockState::Active;
        self.started = Some(Instant::now());
    }

    /// Milliseconds since `start()`, or `None` if never started.
    pub fn elapsed_ms(&self) -> Option<u64> {
        self.started.map(|s| s.elapsed().as_millis() as u64)
    }

    /// Milliseconds until the stage length runs out, or `None` if never
    /// started. Goes negative once the stage runs over time; callers treat
    /// negative as "time out".
    pub fn remaining_ms(&self) -> Option<i64> {
        self.elapsed_ms()
            .map(|elapsed| self.stage_length.as_millis() as i64 - elapsed as i64)
    }

    /// Render a duration as `M:SS`.
    ///
    /// Minutes and seconds are zero-padded to two digits, then a single
    /// leading zero is stripped when the result is exactly five characters
    /// ("05:30" becomes "5:30", "12:34" is left alone).
    pub fn format_mmss(ms: u64) -> String {
        let total_secs = ms / 1000;
        let output = format!("{:02}:{:02}", total_secs / 60, total_secs % 60);
        if output.len() == 5 && output.starts_with('0') {
            output[1..].to_string()
        } else {
            output
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_clock_with_elapsed(elapsed_ms: u64) -> Clock {
        let mut clock = Clock::new(Duration::from_millis(301_000));
        clock.start();
        clock.started = Some(Instant::now() - Duration::from_millis(elapsed_ms));
        clock
    }

    #[test]
    fn idle_clock_reports_none() {
        let clock = Clock::new(Duration::from_secs(301));
        assert_eq!(clock.state, ClockState::Idle);
        assert_eq!(clock.elapsed_ms(), None);
        assert_eq!(clock.remaining_ms(), None);
    }

    #[test]
    fn start_transitions_to_active() {
        let mut clock = Clock::new(Duration::from_secs(301));
        clock.start();
        assert_eq!(clock.state, ClockState::Active);
        assert!(clock.elapsed_ms().is_some());
    }

    #[test]
    fn remaining_decreases_as_elapsed_grows() {
        let earlier = active_clock_with_elapsed(5_000);
        let later = active_clock_with_elapsed(10_000);
        assert!(earlier.remaining_ms().unwrap() > later.remaining_ms().unwrap());
    }

    #[test]
    fn remaining_goes_negative_after_time_out() {
        let clock = active_clock_with_elapsed(302_000);
        assert!(clock.remaining_ms().unwrap() < 0);
    }

    #[test]
    fn format_strips_single_leading_zero() {
        assert_eq!(Clock::format_mmss(90_000), "1:30");
        assert_eq!(Clock::format_mmss(330_000), "5:30");
        assert_eq!(Clock::format_mmss(45_000), "0:45");
    }

    #[test]
    fn format_keeps_double_digit_minutes() {
        assert_eq!(Clock::format_mmss(754_000), "12:34");
        assert_eq!(Clock::format_mmss(600_000), "10:00");
    }

    #[test]
    fn format_truncates_sub_second_remainder() {
        assert_eq!(Clock::format_mmss(90_999), "1:30");
        assert_eq!(Clock::format_mmss(0), "0:00");
    }
}

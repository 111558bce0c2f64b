//! Stage definition types
//!
//! Definitions are loaded from TOML config files and describe scripted
//! stages: the move timeline, the break sub-timeline, and the timing rules
//! that pick the final break segment's length.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// Root Config Structure
// ═══════════════════════════════════════════════════════════════════════════

/// Root structure for stage config files (TOML)
/// A file can contain one or more stage definitions.
///
/// ```toml
/// [[stage]]
/// id = "hbh"
/// name = "High Brunhilda"
///
/// [[stage.moves]]
/// label = "Flame breath"
/// duration_secs = 13.0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageConfig {
    /// Stage definitions in this file
    #[serde(default, rename = "stage")]
    pub stages: Vec<StageDefinition>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Stage Definition
// ═══════════════════════════════════════════════════════════════════════════

/// Definition of a scripted stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDefinition {
    /// Unique identifier (e.g. "hbh")
    pub id: String,

    /// Display name
    pub name: String,

    /// Total stage duration in seconds (the timer window plus buffer)
    #[serde(default = "default_stage_length_secs")]
    pub stage_length_secs: f32,

    /// Move timeline; each duration is the gap from the previous event.
    /// The first entry is the lead-in: it gates the first call-out and is
    /// itself never announced.
    #[serde(default)]
    pub moves: Vec<MoveDefinition>,

    /// Break sub-timeline entered on the user's break call
    #[serde(default)]
    pub break_timeline: Vec<BreakEntry>,

    /// Remaining-time bands that pick the final break segment's duration
    #[serde(default)]
    pub break_timings: Vec<BreakTimingRule>,
}

/// One entry in a stage's move timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveDefinition {
    /// Call-out text
    pub label: String,

    /// Seconds from the previous event to this one
    pub duration_secs: f32,

    /// Bookkeeping entry: advanced over without ever being queued
    #[serde(default)]
    pub skip: bool,
}

/// One entry in the break sub-timeline
///
/// The last entry's effective duration is a per-session value derived from
/// the break timing rules; the shared definition stays untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEntry {
    /// Call-out text
    pub label: String,

    /// Seconds from the previous break event to this one
    pub duration_secs: f32,
}

/// Remaining-time band mapped to a final break segment duration
///
/// Applies when the main clock's remaining time at the break call falls in
/// `[remaining_low_secs, remaining_high_secs)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BreakTimingRule {
    pub remaining_low_secs: f32,
    pub remaining_high_secs: f32,
    pub final_break_secs: f32,
}

// ═══════════════════════════════════════════════════════════════════════════
// Serde Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn default_stage_length_secs() -> f32 {
    // five minutes plus a one second buffer
    301.0
}

// ═══════════════════════════════════════════════════════════════════════════
// Impl Blocks
// ═══════════════════════════════════════════════════════════════════════════

/// Convert a seconds value from a definition table to whole milliseconds.
/// All engine arithmetic happens in milliseconds; this is the single
/// conversion point.
pub(crate) fn secs_to_ms(secs: f32) -> u64 {
    (f64::from(secs) * 1000.0).round() as u64
}

impl MoveDefinition {
    pub fn duration_ms(&self) -> u64 {
        secs_to_ms(self.duration_secs)
    }
}

impl BreakEntry {
    pub fn duration_ms(&self) -> u64 {
        secs_to_ms(self.duration_secs)
    }
}

impl BreakTimingRule {
    /// Check whether a remaining time in milliseconds falls in this band.
    pub fn contains(&self, remaining_ms: i64) -> bool {
        remaining_ms >= secs_to_ms(self.remaining_low_secs) as i64
            && remaining_ms < secs_to_ms(self.remaining_high_secs) as i64
    }
}

impl StageDefinition {
    pub fn stage_length(&self) -> Duration {
        Duration::from_millis(secs_to_ms(self.stage_length_secs))
    }

    /// Break segment durations in milliseconds, as defined. Sessions copy
    /// this and may override the last entry via the timing rules.
    pub fn break_durations_ms(&self) -> Vec<u64> {
        self.break_timeline.iter().map(BreakEntry::duration_ms).collect()
    }

    /// Pick the final break segment duration for the given remaining time,
    /// if any timing band contains it.
    pub fn final_break_ms(&self, remaining_ms: i64) -> Option<u64> {
        self.break_timings
            .iter()
            .find(|rule| rule.contains(remaining_ms))
            .map(|rule| secs_to_ms(rule.final_break_secs))
    }

    /// Validate invariants the loader enforces. Returns the reason on
    /// failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("stage id must not be empty".to_string());
        }
        if self.name.is_empty() {
            return Err(format!("stage '{}' has an empty name", self.id));
        }
        if self.stage_length_secs <= 0.0 {
            return Err(format!("stage '{}' has a non-positive length", self.id));
        }
        if let Some(m) = self.moves.iter().find(|m| m.duration_secs < 0.0) {
            return Err(format!(
                "stage '{}' move '{}' has a negative duration",
                self.id, m.label
            ));
        }
        if let Some(e) = self.break_timeline.iter().find(|e| e.duration_secs < 0.0) {
            return Err(format!(
                "stage '{}' break entry '{}' has a negative duration",
                self.id, e.label
            ));
        }
        if let Some(rule) = self
            .break_timings
            .iter()
            .find(|r| r.remaining_low_secs >= r.remaining_high_secs)
        {
            return Err(format!(
                "stage '{}' break timing band [{}, {}) is empty",
                self.id, rule.remaining_low_secs, rule.remaining_high_secs
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secs_to_ms_rounds_fractional_seconds() {
        assert_eq!(secs_to_ms(1.5), 1_500);
        assert_eq!(secs_to_ms(301.0), 301_000);
        assert_eq!(secs_to_ms(0.0), 0);
    }

    #[test]
    fn timing_bands_are_half_open() {
        let rule = BreakTimingRule {
            remaining_low_secs: 140.0,
            remaining_high_secs: 145.0,
            final_break_secs: 7.0,
        };
        assert!(rule.contains(140_000));
        assert!(rule.contains(144_999));
        assert!(!rule.contains(145_000));
        assert!(!rule.contains(139_999));
    }

    #[test]
    fn final_break_picks_the_containing_band() {
        let stage = StageDefinition {
            id: "t".to_string(),
            name: "T".to_string(),
            stage_length_secs: 301.0,
            moves: Vec::new(),
            break_timeline: Vec::new(),
            break_timings: vec![
                BreakTimingRule {
                    remaining_low_secs: 140.0,
                    remaining_high_secs: 145.0,
                    final_break_secs: 7.0,
                },
                BreakTimingRule {
                    remaining_low_secs: 135.0,
                    remaining_high_secs: 140.0,
                    final_break_secs: 1.5,
                },
            ],
        };

        assert_eq!(stage.final_break_ms(142_000), Some(7_000));
        assert_eq!(stage.final_break_ms(137_500), Some(1_500));
        assert_eq!(stage.final_break_ms(134_999), None);
        assert_eq!(stage.final_break_ms(200_000), None);
    }

    #[test]
    fn validation_rejects_empty_bands() {
        let stage = StageDefinition {
            id: "t".to_string(),
            name: "T".to_string(),
            stage_length_secs: 301.0,
            moves: Vec::new(),
            break_timeline: Vec::new(),
            break_timings: vec![BreakTimingRule {
                remaining_low_secs: 145.0,
                remaining_high_secs: 140.0,
                final_break_secs: 7.0,
            }],
        };
        assert!(stage.validate().is_err());
    }
}

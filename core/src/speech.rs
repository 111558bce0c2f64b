//! Announcement assembly and the speech output seam
//!
//! The engine produces announcement text; actually speaking it is the
//! host's job, behind [`SpeechSink`]. Voice parameters are plain
//! configuration data mirroring the host synthesizer's knobs.

use serde::{Deserialize, Serialize};

/// Join queued call labels into one announcement.
///
/// Labels join with ", " and the last is prefixed with "and " when more
/// than one is queued: `["Break", "End of Break"]` becomes
/// "Break, and End of Break".
pub fn join_calls(labels: &[String]) -> String {
    match labels {
        [single] => single.clone(),
        _ => {
            let mut message = String::new();
            for (index, label) in labels.iter().enumerate() {
                if index == labels.len() - 1 {
                    message.push_str("and ");
                    message.push_str(label);
                } else {
                    message.push_str(label);
                    message.push_str(", ");
                }
            }
            message
        }
    }
}

/// Voice configuration for the host's speech synthesizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Master toggle for spoken call-outs
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Playback volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Speaking rate multiplier
    #[serde(default = "default_rate")]
    pub rate: f32,

    /// Voice pitch multiplier
    #[serde(default = "default_pitch")]
    pub pitch: f32,

    /// Named voice to select (None = synthesizer default)
    #[serde(default)]
    pub voice: Option<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: default_volume(),
            rate: default_rate(),
            pitch: default_pitch(),
            voice: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_volume() -> f32 {
    0.8
}

fn default_rate() -> f32 {
    0.75
}

fn default_pitch() -> f32 {
    0.8
}

/// Receives announcement text and speaks it.
///
/// Dispatch is fire-and-forget: implementations must not block, and
/// overlapping utterances are their concern, not the engine's.
pub trait SpeechSink: Send + Sync {
    fn say(&self, text: &str);
}

/// Sink that discards all announcements
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SpeechSink for NullSink {
    fn say(&self, _text: &str) {}
}

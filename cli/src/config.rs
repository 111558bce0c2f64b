//! CLI configuration
//!
//! Persisted via confy under the `stagecall` application name. Missing or
//! unreadable config falls back to defaults so the tool always starts.

use serde::{Deserialize, Serialize};
use stagecall_core::{VoiceConfig, POLL_INTERVAL_MS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Command line for the external speech synthesizer. May contain the
    /// placeholders `{volume}`, `{rate}`, `{pitch}` and `{voice}`; the
    /// announcement text is appended as the final argument.
    #[serde(default = "default_speech_command")]
    pub speech_command: String,

    /// Voice parameters substituted into the speech command
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Extra directory of stage definition TOMLs, merged over the built-ins
    #[serde(default)]
    pub stage_directory: Option<String>,

    /// Stage selected at startup
    #[serde(default = "default_stage")]
    pub default_stage: String,

    /// Poll cadence for the advancement loop, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            speech_command: default_speech_command(),
            voice: VoiceConfig::default(),
            stage_directory: None,
            default_stage: default_stage(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_speech_command() -> String {
    "espeak".to_string()
}

fn default_stage() -> String {
    "hbh".to_string()
}

fn default_poll_interval_ms() -> u64 {
    POLL_INTERVAL_MS
}

impl AppConfig {
    pub fn load() -> Self {
        confy::load("stagecall", "config").unwrap_or_default()
    }

    pub fn save(self) {
        if let Err(e) = confy::store("stagecall", "config", self) {
            tracing::warn!("failed to save configuration: {e}");
        }
    }
}

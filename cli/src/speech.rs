//! External-command speech sink
//!
//! Dispatches announcement text to a configured synthesizer command such
//! as `espeak` or `say`. Dispatch is fire-and-forget: the child process is
//! spawned detached and never awaited, so overlapping utterances are the
//! synthesizer's problem.

use stagecall_core::{SpeechSink, VoiceConfig};
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
}

impl CommandSink {
    /// Build a sink from the configured command line, substituting voice
    /// parameters for their placeholders. Returns `None` when the command
    /// line is empty or has invalid quoting.
    pub fn from_config(command_line: &str, voice: &VoiceConfig) -> Option<Self> {
        let expanded = command_line
            .replace("{volume}", &voice.volume.to_string())
            .replace("{rate}", &voice.rate.to_string())
            .replace("{pitch}", &voice.pitch.to_string())
            .replace("{voice}", voice.voice.as_deref().unwrap_or_default());

        let mut parts = shlex::split(&expanded)?;
        if parts.is_empty() {
            return None;
        }

        let program = parts.remove(0);
        Some(Self {
            program,
            args: parts,
        })
    }
}

impl SpeechSink for CommandSink {
    fn say(&self, text: &str) {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(text);

        match command.spawn() {
            Ok(_child) => {
                tracing::debug!(program = %self.program, text, "speech dispatched");
            }
            Err(e) => {
                tracing::warn!(program = %self.program, "speech dispatch failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_line_is_rejected() {
        assert!(CommandSink::from_config("", &VoiceConfig::default()).is_none());
        assert!(CommandSink::from_config("   ", &VoiceConfig::default()).is_none());
    }

    #[test]
    fn placeholders_are_substituted() {
        let voice = VoiceConfig {
            voice: Some("en-us".to_string()),
            ..VoiceConfig::default()
        };
        let sink = CommandSink::from_config("espeak -v {voice} -s {rate}", &voice)
            .expect("command should parse");

        assert_eq!(sink.program, "espeak");
        assert_eq!(sink.args, ["-v", "en-us", "-s", "0.75"]);
    }

    #[test]
    fn quoted_arguments_survive_splitting() {
        let sink = CommandSink::from_config(r#"say -v "Samantha Enhanced""#, &VoiceConfig::default())
            .expect("command should parse");

        assert_eq!(sink.program, "say");
        assert_eq!(sink.args, ["-v", "Samantha Enhanced"]);
    }
}

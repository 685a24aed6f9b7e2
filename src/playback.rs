//! Pronunciation playback
//!
//! Words are spoken through an external text-to-speech program. Playback is
//! best effort: callers use [`pronounce`], which never fails and reports
//! whether anything was spoken.

use std::process::{Command, Stdio};

use thiserror::Error;

use crate::settings::{SpeechConfig, VOICE_PLACEHOLDER};
use crate::vocab::Accent;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Nothing to pronounce")]
    EmptyWord,

    #[error("Speech playback is disabled")]
    NotConfigured,

    #[error("Speech command not found: {0}")]
    CommandNotFound(String),

    #[error("Speech command failed: {0}")]
    CommandFailed(String),
}

/// Something that can say a word out loud
pub trait Speaker {
    fn speak(&self, word: &str, accent: Accent) -> Result<(), PlaybackError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Spoken,
    Unsupported,
}

/// Speak `word`, logging instead of failing when playback is unavailable
pub fn pronounce(speaker: &dyn Speaker, word: &str, accent: Accent) -> PlaybackStatus {
    match speaker.speak(word.trim(), accent) {
        Ok(()) => PlaybackStatus::Spoken,
        Err(e) => {
            log::warn!("Could not pronounce '{}': {}", word, e);
            PlaybackStatus::Unsupported
        }
    }
}

/// Runs the configured speech command and waits for it to finish
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    config: SpeechConfig,
}

impl CommandSpeaker {
    pub fn new(config: SpeechConfig) -> Self {
        Self { config }
    }

    /// Arguments passed to the command for `word` in `accent`
    pub fn args_for(&self, word: &str, accent: Accent) -> Vec<String> {
        let voice = self.config.voice(accent);
        let mut args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| arg.replace(VOICE_PLACEHOLDER, voice))
            .collect();
        args.push(word.to_string());
        args
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, word: &str, accent: Accent) -> Result<(), PlaybackError> {
        if word.trim().is_empty() {
            return Err(PlaybackError::EmptyWord);
        }
        if self.config.command.is_empty() {
            return Err(PlaybackError::NotConfigured);
        }

        let status = Command::new(&self.config.command)
            .args(self.args_for(word, accent))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                PlaybackError::CommandNotFound(format!("{}: {}", self.config.command, e))
            })?;

        if !status.success() {
            return Err(PlaybackError::CommandFailed(format!(
                "{} exited with {}",
                self.config.command, status
            )));
        }

        log::debug!("Pronounced '{}' with {} voice", word, accent);
        Ok(())
    }
}

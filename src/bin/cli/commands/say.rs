use anyhow::{bail, Result};

use vocab_log_lib::playback::{pronounce, CommandSpeaker, PlaybackStatus};
use vocab_log_lib::vocab::Accent;

use crate::app::App;

pub fn run(app: &App, word: &str, accent: Option<Accent>) -> Result<()> {
    if word.trim().is_empty() {
        bail!("Nothing to pronounce");
    }

    let accent = accent.unwrap_or(app.settings.accent);
    let speaker = CommandSpeaker::new(app.settings.speech.clone());

    if pronounce(&speaker, word, accent) == PlaybackStatus::Unsupported {
        eprintln!(
            "Speech playback is not available. Install `{}` or set another program with `vocab-log config --speech-command`.",
            if app.settings.speech.command.is_empty() {
                "espeak-ng"
            } else {
                app.settings.speech.command.as_str()
            }
        );
    }

    Ok(())
}

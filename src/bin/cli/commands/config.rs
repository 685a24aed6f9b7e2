use anyhow::{Context, Result};

use vocab_log_lib::settings::{save_settings, settings_path};
use vocab_log_lib::vocab::Accent;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    accent: Option<Accent>,
    speech_command: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let changed = accent.is_some() || speech_command.is_some();

    if let Some(accent) = accent {
        app.settings.accent = accent;
    }
    if let Some(command) = speech_command {
        app.settings.speech.command = command.trim().to_string();
    }
    if changed {
        save_settings(&app.data_dir, &app.settings).context("Failed to save settings")?;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&app.settings)?);
        }
        OutputFormat::Plain => {
            println!("Data directory: {}", app.data_dir.display());
            println!("Settings file: {}", settings_path(&app.data_dir).display());
            println!("Accent: {}", app.settings.accent);
            let speech = &app.settings.speech;
            if speech.command.is_empty() {
                println!("Speech: disabled");
            } else {
                println!("Speech: {} {}", speech.command, speech.args.join(" "));
            }
        }
    }

    Ok(())
}

//! User settings
//!
//! Stored as `settings.json` in the data directory. A missing file means
//! defaults; unknown or missing fields fall back to their defaults too.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::storage::Result;
use crate::vocab::Accent;

/// Placeholder in speech arguments replaced by the accent's voice
pub const VOICE_PLACEHOLDER: &str = "{voice}";

/// External text-to-speech command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeechConfig {
    /// Program to run; empty disables playback
    pub command: String,
    /// Arguments before the word; `{voice}` is substituted
    pub args: Vec<String>,
    pub voice_us: String,
    pub voice_uk: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            command: "espeak-ng".to_string(),
            args: vec![
                "-v".to_string(),
                VOICE_PLACEHOLDER.to_string(),
                "-s".to_string(),
                "160".to_string(),
            ],
            voice_us: "en-us".to_string(),
            voice_uk: "en-gb".to_string(),
        }
    }
}

impl SpeechConfig {
    pub fn voice(&self, accent: Accent) -> &str {
        match accent {
            Accent::Us => &self.voice_us,
            Accent::Uk => &self.voice_uk,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Accent used for practice and playback unless overridden
    pub accent: Accent,
    pub speech: SpeechConfig,
}

/// Get the settings file path
pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

/// Load settings from file
pub fn load_settings(data_dir: &Path) -> Result<Settings> {
    let path = settings_path(data_dir);

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(&path)?;
    let settings: Settings = serde_json::from_str(&content)?;
    Ok(settings)
}

/// Save settings to file
pub fn save_settings(data_dir: &Path, settings: &Settings) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let content = serde_json::to_string_pretty(settings)?;
    fs::write(settings_path(data_dir), content)?;
    log::info!("Saved settings to {:?}", settings_path(data_dir));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let settings = load_settings(temp_dir.path()).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.accent, Accent::Us);
        assert_eq!(settings.speech.command, "espeak-ng");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("nested");

        let mut settings = Settings::default();
        settings.accent = Accent::Uk;
        settings.speech.command = "say".to_string();
        settings.speech.args = vec!["-v".to_string(), VOICE_PLACEHOLDER.to_string()];
        save_settings(&data_dir, &settings).unwrap();

        assert_eq!(load_settings(&data_dir).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(settings_path(temp_dir.path()), r#"{"accent":"UK"}"#).unwrap();

        let settings = load_settings(temp_dir.path()).unwrap();

        assert_eq!(settings.accent, Accent::Uk);
        assert_eq!(settings.speech, SpeechConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(settings_path(temp_dir.path()), "accent = UK").unwrap();

        assert!(load_settings(temp_dir.path()).is_err());
    }

    #[test]
    fn test_voice_for_accent() {
        let speech = SpeechConfig::default();
        assert_eq!(speech.voice(Accent::Us), "en-us");
        assert_eq!(speech.voice(Accent::Uk), "en-gb");
    }
}

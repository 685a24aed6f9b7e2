use anyhow::{Context, Result};
use clap::Args;

use vocab_log_lib::vocab::{PartOfSpeech, UpdateEntryRequest, VocabEntry};

use crate::app::{entry_at, App};
use crate::OutputFormat;

/// Optional entry fields shared by `add` and `edit`
#[derive(Args, Debug, Default)]
pub struct EntryArgs {
    /// Meaning or translation
    #[arg(long)]
    pub meaning: Option<String>,
    /// Part of speech: N, V, Adj, Adv, Phrase, Collocation, Idiom
    #[arg(long = "pos")]
    pub part_of_speech: Option<PartOfSpeech>,
    /// Example sentence
    #[arg(long)]
    pub example: Option<String>,
    /// Free-form note
    #[arg(long)]
    pub note: Option<String>,
    /// IPA transcription, without slashes
    #[arg(long)]
    pub ipa: Option<String>,
    /// Informal pronunciation transcript
    #[arg(long)]
    pub transcript: Option<String>,
}

impl EntryArgs {
    fn into_request(self) -> UpdateEntryRequest {
        UpdateEntryRequest {
            meaning: self.meaning,
            part_of_speech: self.part_of_speech,
            example: self.example,
            note: self.note,
            ipa: self.ipa,
            transcript: self.transcript,
            ..Default::default()
        }
    }
}

pub fn run_add(
    app: &mut App,
    query: &str,
    word: String,
    fields: EntryArgs,
    format: &OutputFormat,
) -> Result<()> {
    let session = app.find_session(query)?;

    let mut entry = VocabEntry::new(word.trim().to_string(), String::new());
    entry.apply(fields.into_request());

    let entry = app
        .sessions
        .add_entry(&session.id, entry)
        .context("Failed to add entry")?;

    print_entry_result("Added", session.entries.len() + 1, &session.topic, &entry, format)
}

pub fn run_edit(
    app: &mut App,
    query: &str,
    number: usize,
    word: Option<String>,
    fields: EntryArgs,
    mastered: Option<bool>,
    format: &OutputFormat,
) -> Result<()> {
    let session = app.find_session(query)?;
    let entry_id = entry_at(&session, number)?.id.clone();

    let request = UpdateEntryRequest {
        word: word.map(|w| w.trim().to_string()),
        mastered,
        ..fields.into_request()
    };

    let entry = app
        .sessions
        .update_entry(&session.id, &entry_id, request)
        .context("Failed to update entry")?;

    print_entry_result("Updated", number, &session.topic, &entry, format)
}

pub fn run_rm(app: &mut App, query: &str, number: usize, format: &OutputFormat) -> Result<()> {
    let session = app.find_session(query)?;
    let entry = entry_at(&session, number)?.clone();

    app.sessions
        .remove_entry(&session.id, &entry.id)
        .context("Failed to remove entry")?;

    print_entry_result("Removed", number, &session.topic, &entry, format)
}

fn print_entry_result(
    action: &str,
    number: usize,
    topic: &str,
    entry: &VocabEntry,
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "action": action.to_lowercase(),
                "number": number,
                "entry": entry,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} #{} \"{}\" in \"{}\"", action, number, entry.word, topic);
        }
    }
    Ok(())
}

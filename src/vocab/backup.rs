//! JSON backup and CSV export of the session collection

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::models::Session;
use super::storage::SessionStore;
use crate::storage::{KeyValueStore, Result, StorageError};

const CSV_HEADER: [&str; 11] = [
    "Session Date",
    "Topic",
    "Mood",
    "Time (min)",
    "No.",
    "Word/Phrase",
    "Meaning",
    "Function",
    "Example",
    "Note",
    "Mastered",
];

/// Suggested file name for a JSON backup taken on `date`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("vocab-log-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Suggested file name for a CSV export taken on `date`
pub fn csv_file_name(date: NaiveDate) -> String {
    format!("vocab-log-{}.csv", date.format("%Y-%m-%d"))
}

/// Serialize sessions as a pretty-printed JSON array
pub fn sessions_to_json(sessions: &[Session]) -> Result<String> {
    Ok(serde_json::to_string_pretty(sessions)?)
}

/// Parse a JSON backup, failing on any malformed session
pub fn sessions_from_json(json: &str) -> Result<Vec<Session>> {
    Ok(serde_json::from_str(json)?)
}

/// Render sessions as CSV, one row per entry
///
/// Fields containing a comma, quote or line break are quoted with inner
/// quotes doubled.
pub fn sessions_to_csv(sessions: &[Session]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for session in sessions {
        let date = session.date.format("%Y-%m-%d").to_string();
        let minutes = session.time_spent.to_string();

        for (i, entry) in session.entries.iter().enumerate() {
            let number = (i + 1).to_string();
            writer.write_record([
                date.as_str(),
                session.topic.as_str(),
                session.mood.as_str(),
                minutes.as_str(),
                number.as_str(),
                entry.word.as_str(),
                entry.meaning.as_str(),
                entry.part_of_speech.as_str(),
                entry.example.as_str(),
                entry.note.as_str(),
                if entry.mastered { "Yes" } else { "No" },
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StorageError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| StorageError::InvalidOperation(e.to_string()))
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Dump every stored session as JSON
    pub fn export_json(&self) -> Result<String> {
        sessions_to_json(&self.list_sessions())
    }

    /// Dump every stored entry as CSV
    pub fn export_csv(&self) -> Result<String> {
        sessions_to_csv(&self.list_sessions())
    }

    /// Replace the stored collection with the sessions in a JSON backup
    ///
    /// The document is parsed in full before anything is written, so a
    /// malformed backup leaves the stored sessions untouched.
    pub fn import_json(&mut self, json: &str) -> Result<Vec<Session>> {
        let sessions = sessions_from_json(json)?;
        self.replace_sessions(&sessions)?;
        log::info!("Imported {} sessions from backup", sessions.len());
        Ok(sessions)
    }
}

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use vocab_log_lib::settings::{self, Settings};
use vocab_log_lib::storage::FileStorage;
use vocab_log_lib::streak::StreakTracker;
use vocab_log_lib::vocab::{Session, SessionStore, VocabEntry};

/// Shared application state for CLI commands
pub struct App {
    pub data_dir: PathBuf,
    pub settings: Settings,
    pub sessions: SessionStore<FileStorage>,
    pub streak: StreakTracker<FileStorage>,
}

impl App {
    /// Open the data directory, falling back to the platform default
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => FileStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let storage = FileStorage::new(data_dir.clone());
        storage
            .init()
            .with_context(|| format!("Failed to initialize {}", data_dir.display()))?;

        let settings = settings::load_settings(&data_dir).context("Failed to load settings")?;

        Ok(Self {
            sessions: SessionStore::new(storage.clone()),
            streak: StreakTracker::new(storage),
            settings,
            data_dir,
        })
    }

    /// Find a session by id, then by topic (case-insensitive prefix match)
    pub fn find_session(&self, query: &str) -> Result<Session> {
        let sessions = self.sessions.list_sessions_by_date();

        if let Some(session) = sessions.iter().find(|s| s.id == query) {
            return Ok(session.clone());
        }

        let query_lower = query.to_lowercase();

        // Exact topic match first
        let exact: Vec<&Session> = sessions
            .iter()
            .filter(|s| s.topic.to_lowercase() == query_lower)
            .collect();
        if exact.len() == 1 {
            return Ok(exact[0].clone());
        }

        // Topic or id prefix match
        let matches: Vec<&Session> = if exact.is_empty() {
            sessions
                .iter()
                .filter(|s| {
                    s.topic.to_lowercase().starts_with(&query_lower) || s.id.starts_with(query)
                })
                .collect()
        } else {
            exact
        };

        match matches.len() {
            0 if sessions.is_empty() => {
                bail!("No sessions yet. Create one with `vocab-log new <topic>`")
            }
            0 => bail!(
                "No session matching '{}'. Available sessions:\n{}",
                query,
                list_for_error(sessions.iter())
            ),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous session '{}'. Matches:\n{}",
                query,
                list_for_error(matches.into_iter())
            ),
        }
    }

    /// Record today as a study day; failures only warn
    pub fn record_study_day(&mut self) {
        if let Err(e) = self.streak.record_study_day() {
            log::warn!("Failed to record study day: {}", e);
        }
    }
}

/// Look up an entry by its 1-based number
pub fn entry_at(session: &Session, number: usize) -> Result<&VocabEntry> {
    if number == 0 || number > session.entries.len() {
        bail!(
            "No entry #{} in '{}' (it has {} entries)",
            number,
            session.topic,
            session.entries.len()
        );
    }
    Ok(&session.entries[number - 1])
}

/// Short id prefix used when listing sessions
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn list_for_error<'a>(sessions: impl Iterator<Item = &'a Session>) -> String {
    sessions
        .map(|s| format!("  - {} {} ({})", s.date, s.topic, short_id(&s.id)))
        .collect::<Vec<_>>()
        .join("\n")
}

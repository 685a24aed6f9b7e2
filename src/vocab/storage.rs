//! Session and entry storage
//!
//! All sessions live in a single JSON array under [`SESSIONS_KEY`]. Every
//! mutation reads the array, changes it, and writes it back whole.

use super::models::*;
use crate::practice::RatingSink;
use crate::storage::{KeyValueStore, Result, StorageError};

/// Key holding the serialized session collection
pub const SESSIONS_KEY: &str = "vocab-log-sessions";

/// Typed CRUD over the session collection
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    // ===== Session Operations =====

    /// List all sessions in stored order
    ///
    /// A missing or malformed blob reads as an empty collection.
    pub fn list_sessions(&self) -> Vec<Session> {
        let Some(raw) = self.store.get(SESSIONS_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<Session>>(&raw) {
            Ok(sessions) => sessions,
            Err(e) => {
                log::warn!("Ignoring malformed session data: {}", e);
                Vec::new()
            }
        }
    }

    /// List sessions with the most recent study date first
    pub fn list_sessions_by_date(&self) -> Vec<Session> {
        let mut sessions = self.list_sessions();
        sessions.sort_by(|a, b| b.date.cmp(&a.date));
        sessions
    }

    /// Get a session by ID
    pub fn get_session(&self, id: &str) -> Result<Session> {
        self.list_sessions()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| StorageError::SessionNotFound(id.to_string()))
    }

    /// Create a new, empty session
    pub fn create_session(&mut self, request: CreateSessionRequest) -> Result<Session> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(StorageError::InvalidOperation(
                "Session topic must not be empty".to_string(),
            ));
        }
        if request.time_spent < 1 {
            return Err(StorageError::InvalidOperation(
                "Time spent must be at least 1 minute".to_string(),
            ));
        }

        let session = Session::new(
            topic.to_string(),
            request.date,
            request.mood,
            request.time_spent,
        );

        let mut sessions = self.load_sessions()?;
        sessions.push(session.clone());
        self.save_sessions(&sessions)?;

        log::info!("Created session '{}' ({})", session.topic, session.id);
        Ok(session)
    }

    /// Insert or replace a session by ID
    pub fn save_session(&mut self, session: &Session) -> Result<()> {
        let mut sessions = self.load_sessions()?;
        match sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session.clone(),
            None => sessions.push(session.clone()),
        }
        self.save_sessions(&sessions)
    }

    /// Update a session's header fields
    pub fn update_session(&mut self, id: &str, updates: UpdateSessionRequest) -> Result<Session> {
        self.modify_session(id, |session| {
            if let Some(topic) = updates.topic {
                let topic = topic.trim();
                if topic.is_empty() {
                    return Err(StorageError::InvalidOperation(
                        "Session topic must not be empty".to_string(),
                    ));
                }
                session.topic = topic.to_string();
            }
            if let Some(date) = updates.date {
                session.date = date;
            }
            if let Some(mood) = updates.mood {
                session.mood = mood;
            }
            if let Some(time_spent) = updates.time_spent {
                if time_spent < 1 {
                    return Err(StorageError::InvalidOperation(
                        "Time spent must be at least 1 minute".to_string(),
                    ));
                }
                session.time_spent = time_spent;
            }
            Ok(session.clone())
        })
    }

    /// Delete a session together with all of its entries
    pub fn delete_session(&mut self, id: &str) -> Result<()> {
        let mut sessions = self.load_sessions()?;
        let len_before = sessions.len();
        sessions.retain(|s| s.id != id);

        if sessions.len() == len_before {
            return Err(StorageError::SessionNotFound(id.to_string()));
        }

        self.save_sessions(&sessions)?;
        log::info!("Deleted session {}", id);
        Ok(())
    }

    /// Replace the whole collection
    pub fn replace_sessions(&mut self, sessions: &[Session]) -> Result<()> {
        self.save_sessions(sessions)
    }

    /// Read the collection ahead of a write
    ///
    /// Unlike `list_sessions`, a blob that is present but unreadable is an
    /// error, so the write that follows never replaces it.
    fn load_sessions(&self) -> Result<Vec<Session>> {
        match self.store.get(SESSIONS_KEY) {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_sessions(&mut self, sessions: &[Session]) -> Result<()> {
        let json = serde_json::to_string(sessions)?;
        self.store.set(SESSIONS_KEY, &json)
    }

    /// Load, mutate and save one session; nothing is written if `f` fails
    fn modify_session<T>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut Session) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.load_sessions()?;
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StorageError::SessionNotFound(id.to_string()))?;

        let result = f(session)?;
        self.save_sessions(&sessions)?;
        Ok(result)
    }

    // ===== Entry Operations =====

    /// Append an entry to the end of a session
    pub fn add_entry(&mut self, session_id: &str, entry: VocabEntry) -> Result<VocabEntry> {
        self.modify_session(session_id, |session| {
            if session.find_entry(&entry.id).is_some() {
                return Err(StorageError::InvalidOperation(format!(
                    "Entry {} already exists",
                    entry.id
                )));
            }
            session.entries.push(entry.clone());
            Ok(entry)
        })
    }

    /// Apply a partial update to one entry
    pub fn update_entry(
        &mut self,
        session_id: &str,
        entry_id: &str,
        updates: UpdateEntryRequest,
    ) -> Result<VocabEntry> {
        self.modify_session(session_id, |session| {
            let entry = session
                .entries
                .iter_mut()
                .find(|e| e.id == entry_id)
                .ok_or_else(|| StorageError::EntryNotFound(entry_id.to_string()))?;
            entry.apply(updates);
            Ok(entry.clone())
        })
    }

    /// Remove one entry from a session
    pub fn remove_entry(&mut self, session_id: &str, entry_id: &str) -> Result<()> {
        self.modify_session(session_id, |session| {
            let len_before = session.entries.len();
            session.entries.retain(|e| e.id != entry_id);
            if session.entries.len() == len_before {
                return Err(StorageError::EntryNotFound(entry_id.to_string()));
            }
            Ok(())
        })
    }

    /// Store the latest practice rating on an entry
    pub fn update_entry_rating(
        &mut self,
        session_id: &str,
        entry_id: &str,
        rating: PracticeRating,
    ) -> Result<()> {
        self.update_entry(
            session_id,
            entry_id,
            UpdateEntryRequest {
                practice_rating: Some(rating),
                ..Default::default()
            },
        )
        .map(|_| ())
    }
}

impl<S: KeyValueStore> RatingSink for SessionStore<S> {
    fn update_entry_rating(
        &mut self,
        session_id: &str,
        entry_id: &str,
        rating: PracticeRating,
    ) -> Result<()> {
        SessionStore::update_entry_rating(self, session_id, entry_id, rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;

    fn create_test_store() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::new())
    }

    fn request(topic: &str, date: &str) -> CreateSessionRequest {
        CreateSessionRequest {
            topic: topic.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            mood: Mood::Happy,
            time_spent: 30,
        }
    }

    #[test]
    fn test_create_and_get_session() {
        let mut store = create_test_store();

        let created = store.create_session(request("  Academic Writing ", "2024-04-02")).unwrap();
        assert_eq!(created.topic, "Academic Writing");
        assert!(created.entries.is_empty());

        let fetched = store.get_session(&created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_create_session_validation() {
        let mut store = create_test_store();

        assert!(store.create_session(request("   ", "2024-04-02")).is_err());

        let mut zero_minutes = request("Travel", "2024-04-02");
        zero_minutes.time_spent = 0;
        assert!(store.create_session(zero_minutes).is_err());

        assert!(store.list_sessions().is_empty());
    }

    #[test]
    fn test_missing_and_malformed_data_read_as_empty() {
        let store = create_test_store();
        assert!(store.list_sessions().is_empty());

        let store = SessionStore::new(MemoryStorage::new().with_value(SESSIONS_KEY, "{not json"));
        assert!(store.list_sessions().is_empty());
    }

    #[test]
    fn test_writes_refuse_to_replace_unreadable_data() {
        let good = r#"{"id":"good","date":"2024-04-01","topic":"Kept","mood":"happy","timeSpent":20,"entries":[],"createdAt":"2024-04-01T10:00:00Z"}"#;
        let blank_date = format!(
            r#"[{},{{"id":"odd","date":"","topic":"Cleared","mood":"happy","timeSpent":5,"entries":[],"createdAt":"2024-04-02T10:00:00Z"}}]"#,
            good
        );
        let fractional = format!(
            r#"[{},{{"id":"frac","date":"2024-04-02","topic":"Half","mood":"happy","timeSpent":1.5,"entries":[],"createdAt":"2024-04-02T10:00:00Z"}}]"#,
            good
        );

        for raw in [blank_date, fractional] {
            let mut store = SessionStore::new(MemoryStorage::new().with_value(SESSIONS_KEY, &raw));
            assert!(store.list_sessions().is_empty());

            let created = store.create_session(request("New", "2024-04-03"));
            assert!(matches!(created, Err(StorageError::Json(_))));
            assert!(store.delete_session("good").is_err());
            assert!(store
                .update_session("good", UpdateSessionRequest::default())
                .is_err());

            assert_eq!(store.store().write_count(), 0);
            assert_eq!(store.store().get(SESSIONS_KEY).as_deref(), Some(raw.as_str()));
        }
    }

    #[test]
    fn test_list_sessions_by_date() {
        let mut store = create_test_store();
        store.create_session(request("Middle", "2024-02-10")).unwrap();
        store.create_session(request("Newest", "2024-05-01")).unwrap();
        store.create_session(request("Oldest", "2023-12-24")).unwrap();

        let topics: Vec<String> = store
            .list_sessions_by_date()
            .into_iter()
            .map(|s| s.topic)
            .collect();
        assert_eq!(topics, vec!["Newest", "Middle", "Oldest"]);
    }

    #[test]
    fn test_update_session() {
        let mut store = create_test_store();
        let session = store.create_session(request("Travel", "2024-04-02")).unwrap();

        let updated = store
            .update_session(
                &session.id,
                UpdateSessionRequest {
                    mood: Some(Mood::Tired),
                    time_spent: Some(50),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.mood, Mood::Tired);
        assert_eq!(updated.time_spent, 50);
        assert_eq!(updated.topic, "Travel");
    }

    #[test]
    fn test_delete_session_cascades() {
        let mut store = create_test_store();
        let session = store.create_session(request("Travel", "2024-04-02")).unwrap();
        store
            .add_entry(&session.id, VocabEntry::new("itinerary".to_string(), String::new()))
            .unwrap();

        store.delete_session(&session.id).unwrap();

        assert!(store.get_session(&session.id).is_err());
        assert!(store.list_sessions().is_empty());
        assert!(matches!(
            store.delete_session(&session.id),
            Err(StorageError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut store = create_test_store();
        let session = store.create_session(request("Travel", "2024-04-02")).unwrap();

        for word in ["luggage", "boarding pass", "layover"] {
            store
                .add_entry(&session.id, VocabEntry::new(word.to_string(), String::new()))
                .unwrap();
        }

        let words: Vec<String> = store
            .get_session(&session.id)
            .unwrap()
            .entries
            .into_iter()
            .map(|e| e.word)
            .collect();
        assert_eq!(words, vec!["luggage", "boarding pass", "layover"]);
    }

    #[test]
    fn test_update_entry_only_touches_given_fields() {
        let mut store = create_test_store();
        let session = store.create_session(request("Travel", "2024-04-02")).unwrap();
        let mut entry = VocabEntry::new("layover".to_string(), "a stop".to_string());
        entry.example = "A two-hour layover in Doha.".to_string();
        let entry = store.add_entry(&session.id, entry).unwrap();

        store
            .update_entry(
                &session.id,
                &entry.id,
                UpdateEntryRequest {
                    mastered: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        let stored = store.get_session(&session.id).unwrap();
        let stored = stored.find_entry(&entry.id).unwrap();
        assert!(stored.mastered);
        assert_eq!(stored.meaning, "a stop");
        assert_eq!(stored.example, "A two-hour layover in Doha.");
    }

    #[test]
    fn test_remove_entry() {
        let mut store = create_test_store();
        let session = store.create_session(request("Travel", "2024-04-02")).unwrap();
        let keep = store
            .add_entry(&session.id, VocabEntry::new("keep".to_string(), String::new()))
            .unwrap();
        let drop = store
            .add_entry(&session.id, VocabEntry::new("drop".to_string(), String::new()))
            .unwrap();

        store.remove_entry(&session.id, &drop.id).unwrap();

        let stored = store.get_session(&session.id).unwrap();
        assert_eq!(stored.entries.len(), 1);
        assert_eq!(stored.entries[0].id, keep.id);
        assert!(matches!(
            store.remove_entry(&session.id, &drop.id),
            Err(StorageError::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_update_entry_rating() {
        let mut store = create_test_store();
        let session = store.create_session(request("Travel", "2024-04-02")).unwrap();
        let entry = store
            .add_entry(&session.id, VocabEntry::new("layover".to_string(), String::new()))
            .unwrap();

        store
            .update_entry_rating(&session.id, &entry.id, PracticeRating::Forgot)
            .unwrap();

        let stored = store.get_session(&session.id).unwrap();
        assert_eq!(
            stored.find_entry(&entry.id).unwrap().practice_rating,
            Some(PracticeRating::Forgot)
        );
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let mut store = create_test_store();
        let session = store.create_session(request("Travel", "2024-04-02")).unwrap();
        let writes_before = store.store().write_count();

        let result = store.update_entry(&session.id, "missing", UpdateEntryRequest::default());

        assert!(matches!(result, Err(StorageError::EntryNotFound(_))));
        assert_eq!(store.store().write_count(), writes_before);
    }

    #[test]
    fn test_save_session_upserts() {
        let mut store = create_test_store();
        let mut session = store.create_session(request("Travel", "2024-04-02")).unwrap();

        session.topic = "Business Travel".to_string();
        store.save_session(&session).unwrap();
        assert_eq!(store.list_sessions().len(), 1);
        assert_eq!(store.get_session(&session.id).unwrap().topic, "Business Travel");

        let other = Session::new(
            "Phrasal Verbs".to_string(),
            NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(),
            Mood::Neutral,
            15,
        );
        store.save_session(&other).unwrap();
        assert_eq!(store.list_sessions().len(), 2);
    }
}

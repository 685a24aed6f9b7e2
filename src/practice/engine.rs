//! Flashcard-style practice over one session's entries
//!
//! A run walks the session's practicable entries in order. Each card must be
//! revealed before it can be rated. Ratings stay in memory until the last card
//! is rated; only then are they written back to the session, one update per
//! rated entry. Dropping a run early writes nothing.
//!
//! ```text
//! Reviewing(i, false) --reveal--> Reviewing(i, true) --rate--> Reviewing(i+1, false)
//!                                                     \--rate (last)--> Finished(tally)
//! Finished(tally) --restart--> Reviewing(0, false)
//! ```

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;
use crate::vocab::{Accent, PartOfSpeech, PracticeRating, Session, VocabEntry};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PracticeError {
    #[error("No vocabulary entries to practice")]
    EmptyPool,

    #[error("Reveal the card before rating it")]
    NotRevealed,

    #[error("Practice run is already finished")]
    AlreadyFinished,

    #[error("Practice run is still in progress")]
    NotFinished,
}

/// Receives the ratings of a finished run
pub trait RatingSink {
    fn update_entry_rating(
        &mut self,
        session_id: &str,
        entry_id: &str,
        rating: PracticeRating,
    ) -> Result<(), StorageError>;
}

/// Per-category rating counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub got: usize,
    pub almost: usize,
    pub forgot: usize,
}

impl Tally {
    pub fn from_ratings<'a>(ratings: impl IntoIterator<Item = &'a PracticeRating>) -> Self {
        let mut tally = Tally::default();
        for rating in ratings {
            match rating {
                PracticeRating::Got => tally.got += 1,
                PracticeRating::Almost => tally.almost += 1,
                PracticeRating::Forgot => tally.forgot += 1,
            }
        }
        tally
    }

    pub fn count(&self, rating: PracticeRating) -> usize {
        match rating {
            PracticeRating::Got => self.got,
            PracticeRating::Almost => self.almost,
            PracticeRating::Forgot => self.forgot,
        }
    }

    pub fn total(&self) -> usize {
        self.got + self.almost + self.forgot
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeState {
    Reviewing { index: usize, revealed: bool },
    Finished(Tally),
}

impl PracticeState {
    pub fn is_finished(&self) -> bool {
        matches!(self, PracticeState::Finished(_))
    }
}

/// What the learner sees for the current card
///
/// Meaning and example stay hidden until the card is revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView<'a> {
    pub word: &'a str,
    pub part_of_speech: PartOfSpeech,
    pub pronunciation: Option<String>,
    pub meaning: Option<&'a str>,
    pub example: Option<&'a str>,
}

/// An in-progress practice run over one session
#[derive(Debug, Clone)]
pub struct PracticeRun {
    session_id: String,
    accent: Accent,
    cards: Vec<VocabEntry>,
    ratings: HashMap<String, PracticeRating>,
    state: PracticeState,
}

impl PracticeRun {
    /// Start a run over the session's entries that have word text
    pub fn start(session: &Session, accent: Accent) -> Result<Self, PracticeError> {
        let cards: Vec<VocabEntry> = session
            .entries
            .iter()
            .filter(|e| e.is_practicable())
            .cloned()
            .collect();

        if cards.is_empty() {
            return Err(PracticeError::EmptyPool);
        }

        log::debug!(
            "Starting practice of session {} with {} cards",
            session.id,
            cards.len()
        );

        Ok(Self {
            session_id: session.id.clone(),
            accent,
            cards,
            ratings: HashMap::new(),
            state: PracticeState::Reviewing {
                index: 0,
                revealed: false,
            },
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn accent(&self) -> Accent {
        self.accent
    }

    pub fn state(&self) -> PracticeState {
        self.state
    }

    pub fn cards(&self) -> &[VocabEntry] {
        &self.cards
    }

    /// Ratings collected so far in this run, keyed by entry id
    pub fn ratings(&self) -> &HashMap<String, PracticeRating> {
        &self.ratings
    }

    pub fn current_entry(&self) -> Option<&VocabEntry> {
        match self.state {
            PracticeState::Reviewing { index, .. } => self.cards.get(index),
            PracticeState::Finished(_) => None,
        }
    }

    pub fn current_card(&self) -> Option<CardView<'_>> {
        let PracticeState::Reviewing { index, revealed } = self.state else {
            return None;
        };
        let entry = self.cards.get(index)?;

        Some(CardView {
            word: &entry.word,
            part_of_speech: entry.part_of_speech,
            pronunciation: entry.pronunciation_line(),
            meaning: revealed.then_some(entry.meaning.as_str()),
            example: if revealed && !entry.example.is_empty() {
                Some(entry.example.as_str())
            } else {
                None
            },
        })
    }

    /// 1-based position of the current card and the total card count
    pub fn position(&self) -> Option<(usize, usize)> {
        match self.state {
            PracticeState::Reviewing { index, .. } => Some((index + 1, self.cards.len())),
            PracticeState::Finished(_) => None,
        }
    }

    /// Share of cards already rated, for a progress bar
    pub fn completed_fraction(&self) -> f32 {
        match self.state {
            PracticeState::Reviewing { index, .. } => index as f32 / self.cards.len() as f32,
            PracticeState::Finished(_) => 1.0,
        }
    }

    /// Show the meaning and example of the current card
    pub fn reveal(&mut self) -> Result<(), PracticeError> {
        match self.state {
            PracticeState::Reviewing { index, .. } => {
                self.state = PracticeState::Reviewing {
                    index,
                    revealed: true,
                };
                log::debug!("Revealed card {} of {}", index + 1, self.cards.len());
                Ok(())
            }
            PracticeState::Finished(_) => Err(PracticeError::AlreadyFinished),
        }
    }

    /// Rate the current card and move on
    ///
    /// Rating the last card finishes the run and flushes every collected
    /// rating to `sink`. A failed write is logged and the run still finishes;
    /// the in-memory tally stays authoritative.
    pub fn rate<K>(
        &mut self,
        rating: PracticeRating,
        sink: &mut K,
    ) -> Result<PracticeState, PracticeError>
    where
        K: RatingSink + ?Sized,
    {
        let index = match self.state {
            PracticeState::Reviewing {
                index,
                revealed: true,
            } => index,
            PracticeState::Reviewing { revealed: false, .. } => {
                return Err(PracticeError::NotRevealed)
            }
            PracticeState::Finished(_) => return Err(PracticeError::AlreadyFinished),
        };

        let entry_id = self.cards[index].id.clone();
        log::debug!("Rated card {} ({}) as {}", index + 1, entry_id, rating);
        self.ratings.insert(entry_id, rating);

        if index + 1 < self.cards.len() {
            self.state = PracticeState::Reviewing {
                index: index + 1,
                revealed: false,
            };
        } else {
            let tally = Tally::from_ratings(self.ratings.values());
            log::debug!(
                "Finished practice of session {}: {} got, {} almost, {} forgot",
                self.session_id,
                tally.got,
                tally.almost,
                tally.forgot
            );
            self.state = PracticeState::Finished(tally);
            self.flush(sink);
        }

        Ok(self.state)
    }

    /// Start over from the first card with no ratings
    pub fn restart(&mut self) -> Result<(), PracticeError> {
        if !self.state.is_finished() {
            return Err(PracticeError::NotFinished);
        }
        self.ratings.clear();
        self.state = PracticeState::Reviewing {
            index: 0,
            revealed: false,
        };
        log::debug!("Restarted practice of session {}", self.session_id);
        Ok(())
    }

    /// Abandon the run; ratings not yet flushed are discarded
    pub fn exit(self) {
        log::debug!(
            "Leaving practice of session {} ({:?})",
            self.session_id,
            self.state
        );
    }

    fn flush<K>(&self, sink: &mut K)
    where
        K: RatingSink + ?Sized,
    {
        for card in &self.cards {
            let Some(rating) = self.ratings.get(&card.id) else {
                continue;
            };
            if let Err(e) = sink.update_entry_rating(&self.session_id, &card.id, *rating) {
                log::warn!(
                    "Failed to save practice rating for entry {}: {}",
                    card.id,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::storage::MemoryStorage;
    use crate::vocab::{CreateSessionRequest, Mood, SessionStore};

    #[derive(Default)]
    struct RecordingSink {
        updates: Vec<(String, String, PracticeRating)>,
    }

    impl RatingSink for RecordingSink {
        fn update_entry_rating(
            &mut self,
            session_id: &str,
            entry_id: &str,
            rating: PracticeRating,
        ) -> Result<(), StorageError> {
            self.updates
                .push((session_id.to_string(), entry_id.to_string(), rating));
            Ok(())
        }
    }

    thread_local! {
        static LOGGED: std::cell::RefCell<Vec<String>> = const { std::cell::RefCell::new(Vec::new()) };
    }

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Debug
        }

        fn log(&self, record: &log::Record) {
            if record.target().starts_with(module_path!().trim_end_matches("::tests")) {
                LOGGED.with(|l| l.borrow_mut().push(record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger;

    fn take_logged() -> Vec<String> {
        LOGGED.with(|l| std::mem::take(&mut *l.borrow_mut()))
    }

    fn session_with_words(words: &[&str]) -> Session {
        let mut session = Session::new(
            "Practice".to_string(),
            NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
            Mood::Happy,
            30,
        );
        for word in words {
            let mut entry = VocabEntry::new(word.to_string(), format!("meaning of {}", word));
            entry.example = format!("An example with {}.", word);
            session.entries.push(entry);
        }
        session
    }

    fn run_through(run: &mut PracticeRun, ratings: &[PracticeRating], sink: &mut RecordingSink) {
        for rating in ratings {
            run.reveal().unwrap();
            run.rate(*rating, sink).unwrap();
        }
    }

    #[test]
    fn test_empty_pool() {
        let session = session_with_words(&[]);
        assert_eq!(
            PracticeRun::start(&session, Accent::Us).unwrap_err(),
            PracticeError::EmptyPool
        );

        let blanks = session_with_words(&["", "   "]);
        assert_eq!(
            PracticeRun::start(&blanks, Accent::Us).unwrap_err(),
            PracticeError::EmptyPool
        );
    }

    #[test]
    fn test_pool_skips_blank_words_and_keeps_order() {
        let session = session_with_words(&["alpha", "", "gamma", "  ", "epsilon"]);
        let run = PracticeRun::start(&session, Accent::Uk).unwrap();

        let words: Vec<&str> = run.cards().iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["alpha", "gamma", "epsilon"]);
        assert_eq!(
            run.state(),
            PracticeState::Reviewing {
                index: 0,
                revealed: false
            }
        );
        assert_eq!(run.position(), Some((1, 3)));
        assert_eq!(run.accent(), Accent::Uk);
    }

    #[test]
    fn test_full_run_tally() {
        let session = session_with_words(&["one", "two", "three", "four", "five"]);
        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();
        let mut sink = RecordingSink::default();

        let ratings = [
            PracticeRating::Got,
            PracticeRating::Forgot,
            PracticeRating::Got,
            PracticeRating::Almost,
            PracticeRating::Got,
        ];
        run_through(&mut run, &ratings, &mut sink);

        let PracticeState::Finished(tally) = run.state() else {
            panic!("run should be finished");
        };
        assert_eq!(tally.total(), 5);
        assert_eq!(tally.got, 3);
        assert_eq!(tally.almost, 1);
        assert_eq!(tally.forgot, 1);
        assert_eq!(tally.count(PracticeRating::Forgot), 1);
    }

    #[test]
    fn test_unused_categories_report_zero() {
        let session = session_with_words(&["one", "two"]);
        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();
        let mut sink = RecordingSink::default();

        run_through(&mut run, &[PracticeRating::Got, PracticeRating::Got], &mut sink);

        assert_eq!(
            run.state(),
            PracticeState::Finished(Tally {
                got: 2,
                almost: 0,
                forgot: 0
            })
        );
    }

    #[test]
    fn test_rate_requires_reveal() {
        let session = session_with_words(&["one", "two"]);
        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();
        let mut sink = RecordingSink::default();

        let before = run.state();
        assert_eq!(
            run.rate(PracticeRating::Got, &mut sink),
            Err(PracticeError::NotRevealed)
        );
        assert_eq!(run.state(), before);
        assert!(run.ratings().is_empty());
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let session = session_with_words(&["one", "two"]);
        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();

        run.reveal().unwrap();
        run.reveal().unwrap();

        assert_eq!(
            run.state(),
            PracticeState::Reviewing {
                index: 0,
                revealed: true
            }
        );
    }

    #[test]
    fn test_card_view_hides_answer_until_revealed() {
        let session = session_with_words(&["one"]);
        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();

        let hidden = run.current_card().unwrap();
        assert_eq!(hidden.word, "one");
        assert_eq!(hidden.meaning, None);
        assert_eq!(hidden.example, None);

        run.reveal().unwrap();
        let shown = run.current_card().unwrap();
        assert_eq!(shown.meaning, Some("meaning of one"));
        assert_eq!(shown.example, Some("An example with one."));
    }

    #[test]
    fn test_rating_advances_and_hides_next_card() {
        let session = session_with_words(&["one", "two"]);
        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();
        let mut sink = RecordingSink::default();

        run.reveal().unwrap();
        let state = run.rate(PracticeRating::Almost, &mut sink).unwrap();

        assert_eq!(
            state,
            PracticeState::Reviewing {
                index: 1,
                revealed: false
            }
        );
        assert_eq!(run.current_entry().unwrap().word, "two");
        assert!((run.completed_fraction() - 0.5).abs() < f32::EPSILON);
        assert!(sink.updates.is_empty());
    }

    #[test]
    fn test_finished_rejects_reveal_and_rate() {
        let session = session_with_words(&["one"]);
        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();
        let mut sink = RecordingSink::default();
        run_through(&mut run, &[PracticeRating::Forgot], &mut sink);

        let finished = run.state();
        assert_eq!(run.reveal(), Err(PracticeError::AlreadyFinished));
        assert_eq!(
            run.rate(PracticeRating::Got, &mut sink),
            Err(PracticeError::AlreadyFinished)
        );
        assert_eq!(run.state(), finished);
        assert_eq!(sink.updates.len(), 1);
        assert!(run.current_card().is_none());
    }

    #[test]
    fn test_ratings_flushed_once_on_finish() {
        let session = session_with_words(&["one", "two", "three"]);
        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();
        let mut sink = RecordingSink::default();

        run_through(&mut run, &[PracticeRating::Got, PracticeRating::Almost], &mut sink);
        assert!(sink.updates.is_empty());

        run_through(&mut run, &[PracticeRating::Forgot], &mut sink);

        let expected: Vec<(String, String, PracticeRating)> = session
            .entries
            .iter()
            .zip([PracticeRating::Got, PracticeRating::Almost, PracticeRating::Forgot])
            .map(|(e, r)| (session.id.clone(), e.id.clone(), r))
            .collect();
        assert_eq!(sink.updates, expected);
    }

    #[test]
    fn test_transitions_are_logged() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Debug);

        let session = session_with_words(&["one"]);
        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();
        let mut sink = RecordingSink::default();
        take_logged();

        run.reveal().unwrap();
        run.rate(PracticeRating::Got, &mut sink).unwrap();
        run.restart().unwrap();

        let logged = take_logged();
        assert!(logged.iter().any(|m| m.starts_with("Revealed card 1 of 1")));
        assert!(logged.iter().any(|m| m.starts_with("Rated card 1") && m.ends_with("as got")));
        assert!(logged.iter().any(|m| m.starts_with("Finished practice")));
        assert!(logged.iter().any(|m| m.starts_with("Restarted practice")));
    }

    #[test]
    fn test_restart_only_after_finish() {
        let session = session_with_words(&["one", "two"]);
        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();
        assert_eq!(run.restart(), Err(PracticeError::NotFinished));
    }

    #[test]
    fn test_restart_gives_independent_tally() {
        let session = session_with_words(&["one", "two"]);
        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();
        let mut sink = RecordingSink::default();

        run_through(&mut run, &[PracticeRating::Forgot, PracticeRating::Forgot], &mut sink);
        run.restart().unwrap();

        assert_eq!(
            run.state(),
            PracticeState::Reviewing {
                index: 0,
                revealed: false
            }
        );
        assert!(run.ratings().is_empty());

        run_through(&mut run, &[PracticeRating::Got, PracticeRating::Almost], &mut sink);
        assert_eq!(
            run.state(),
            PracticeState::Finished(Tally {
                got: 1,
                almost: 1,
                forgot: 0
            })
        );
        assert_eq!(sink.updates.len(), 4);
    }

    #[test]
    fn test_exit_before_finish_keeps_stored_ratings() {
        let mut store = SessionStore::new(MemoryStorage::new());
        let session = store
            .create_session(CreateSessionRequest {
                topic: "Exit early".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
                mood: Mood::Neutral,
                time_spent: 10,
            })
            .unwrap();
        let mut first = VocabEntry::new("one".to_string(), String::new());
        first.practice_rating = Some(PracticeRating::Almost);
        store.add_entry(&session.id, first).unwrap();
        store
            .add_entry(&session.id, VocabEntry::new("two".to_string(), String::new()))
            .unwrap();
        let before = store.get_session(&session.id).unwrap();
        let writes_before = store.store().write_count();

        let mut run = PracticeRun::start(&before, Accent::Us).unwrap();
        run.reveal().unwrap();
        run.rate(PracticeRating::Forgot, &mut store).unwrap();
        run.exit();

        assert_eq!(store.store().write_count(), writes_before);
        assert_eq!(store.get_session(&session.id).unwrap(), before);
    }

    #[test]
    fn test_completed_run_updates_session_store() {
        let mut store = SessionStore::new(MemoryStorage::new());
        let session = store
            .create_session(CreateSessionRequest {
                topic: "Complete".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
                mood: Mood::Happy,
                time_spent: 10,
            })
            .unwrap();
        store
            .add_entry(&session.id, VocabEntry::new("one".to_string(), String::new()))
            .unwrap();
        store
            .add_entry(&session.id, VocabEntry::blank())
            .unwrap();
        store
            .add_entry(&session.id, VocabEntry::new("three".to_string(), String::new()))
            .unwrap();
        let session = store.get_session(&session.id).unwrap();

        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();
        for rating in [PracticeRating::Got, PracticeRating::Forgot] {
            run.reveal().unwrap();
            run.rate(rating, &mut store).unwrap();
        }

        let stored = store.get_session(&session.id).unwrap();
        let ratings: Vec<Option<PracticeRating>> =
            stored.entries.iter().map(|e| e.practice_rating).collect();
        assert_eq!(
            ratings,
            vec![Some(PracticeRating::Got), None, Some(PracticeRating::Forgot)]
        );
    }

    #[test]
    fn test_flush_failure_still_finishes() {
        let session = session_with_words(&["one"]);
        let seeded = serde_json::to_string(&vec![session.clone()]).unwrap();
        let mut store = SessionStore::new(
            MemoryStorage::failing().with_value(crate::vocab::SESSIONS_KEY, &seeded),
        );

        let mut run = PracticeRun::start(&session, Accent::Us).unwrap();
        run.reveal().unwrap();
        let state = run.rate(PracticeRating::Got, &mut store).unwrap();

        assert!(state.is_finished());
        assert_eq!(store.get_session(&session.id).unwrap().entries[0].practice_rating, None);
    }
}

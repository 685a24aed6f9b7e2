//! Data models for sessions and vocabulary entries

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the learner felt during a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Happy,
    Neutral,
    Tired,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Tired => "tired",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "neutral" => Ok(Mood::Neutral),
            "tired" => Ok(Mood::Tired),
            other => Err(format!("unknown mood '{}' (expected happy, neutral or tired)", other)),
        }
    }
}

/// Grammatical function tag of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PartOfSpeech {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "N")]
    Noun,
    #[serde(rename = "V")]
    Verb,
    #[serde(rename = "Adj")]
    Adjective,
    #[serde(rename = "Adv")]
    Adverb,
    Phrase,
    Collocation,
    Idiom,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 7] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
        PartOfSpeech::Phrase,
        PartOfSpeech::Collocation,
        PartOfSpeech::Idiom,
    ];

    /// Short tag as stored and exported ("" when unspecified)
    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Unspecified => "",
            PartOfSpeech::Noun => "N",
            PartOfSpeech::Verb => "V",
            PartOfSpeech::Adjective => "Adj",
            PartOfSpeech::Adverb => "Adv",
            PartOfSpeech::Phrase => "Phrase",
            PartOfSpeech::Collocation => "Collocation",
            PartOfSpeech::Idiom => "Idiom",
        }
    }

    pub fn is_specified(&self) -> bool {
        *self != PartOfSpeech::Unspecified
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartOfSpeech {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() {
            return Ok(PartOfSpeech::Unspecified);
        }
        PartOfSpeech::ALL
            .iter()
            .copied()
            .find(|pos| pos.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "unknown part of speech '{}' (expected one of {})",
                    wanted,
                    PartOfSpeech::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// Self-assessment given to a card during practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeRating {
    Got,
    Almost,
    Forgot,
}

impl PracticeRating {
    pub const ALL: [PracticeRating; 3] =
        [PracticeRating::Got, PracticeRating::Almost, PracticeRating::Forgot];

    pub fn as_str(&self) -> &'static str {
        match self {
            PracticeRating::Got => "got",
            PracticeRating::Almost => "almost",
            PracticeRating::Forgot => "forgot",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PracticeRating::Got => "Got it",
            PracticeRating::Almost => "Almost",
            PracticeRating::Forgot => "Forgot",
        }
    }
}

impl fmt::Display for PracticeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PracticeRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "got" | "g" => Ok(PracticeRating::Got),
            "almost" | "a" => Ok(PracticeRating::Almost),
            "forgot" | "f" => Ok(PracticeRating::Forgot),
            other => Err(format!("unknown rating '{}' (expected got, almost or forgot)", other)),
        }
    }
}

/// Pronunciation accent used for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Accent {
    #[default]
    Us,
    Uk,
}

impl Accent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accent::Us => "US",
            Accent::Uk => "UK",
        }
    }

    /// BCP 47 language tag for speech synthesis
    pub fn language_tag(&self) -> &'static str {
        match self {
            Accent::Us => "en-US",
            Accent::Uk => "en-GB",
        }
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Accent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "us" | "en-us" => Ok(Accent::Us),
            "uk" | "gb" | "en-gb" => Ok(Accent::Uk),
            other => Err(format!("unknown accent '{}' (expected US or UK)", other)),
        }
    }
}

/// A single vocabulary item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    pub id: String,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(rename = "fn", default)]
    pub part_of_speech: PartOfSpeech,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub mastered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_accent: Option<Accent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipa: Option<String>,
    /// Rating from the most recent completed practice run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice_rating: Option<PracticeRating>,
}

impl VocabEntry {
    /// Create an empty entry with a fresh id
    pub fn blank() -> Self {
        Self {
            id: new_id(),
            word: String::new(),
            meaning: String::new(),
            part_of_speech: PartOfSpeech::Unspecified,
            example: String::new(),
            note: String::new(),
            mastered: false,
            pronunciation_accent: None,
            transcript: None,
            ipa: None,
            practice_rating: None,
        }
    }

    pub fn new(word: String, meaning: String) -> Self {
        Self {
            word,
            meaning,
            ..Self::blank()
        }
    }

    /// Entries without word text are skipped by practice
    pub fn is_practicable(&self) -> bool {
        !self.word.trim().is_empty()
    }

    /// Pronunciation hint, shown only for entries with a transcript
    ///
    /// IPA, when present, replaces the transcript text.
    pub fn pronunciation_line(&self) -> Option<String> {
        let transcript = self.transcript.as_deref().filter(|t| !t.is_empty())?;
        match self.ipa.as_deref() {
            Some(ipa) if !ipa.is_empty() => Some(format!("/{}/", ipa)),
            _ => Some(transcript.to_string()),
        }
    }

    /// Apply a partial update, touching only the provided fields
    pub fn apply(&mut self, updates: UpdateEntryRequest) {
        if let Some(word) = updates.word {
            self.word = word;
        }
        if let Some(meaning) = updates.meaning {
            self.meaning = meaning;
        }
        if let Some(part_of_speech) = updates.part_of_speech {
            self.part_of_speech = part_of_speech;
        }
        if let Some(example) = updates.example {
            self.example = example;
        }
        if let Some(note) = updates.note {
            self.note = note;
        }
        if let Some(mastered) = updates.mastered {
            self.mastered = mastered;
        }
        if updates.pronunciation_accent.is_some() {
            self.pronunciation_accent = updates.pronunciation_accent;
        }
        if updates.transcript.is_some() {
            self.transcript = updates.transcript;
        }
        if updates.ipa.is_some() {
            self.ipa = updates.ipa;
        }
        if updates.practice_rating.is_some() {
            self.practice_rating = updates.practice_rating;
        }
    }
}

/// One study occasion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub date: NaiveDate,
    pub topic: String,
    pub mood: Mood,
    /// Minutes spent
    pub time_spent: u32,
    /// Insertion order; numbering in listings and exports follows it
    #[serde(default)]
    pub entries: Vec<VocabEntry>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(topic: String, date: NaiveDate, mood: Mood, time_spent: u32) -> Self {
        Self {
            id: new_id(),
            date,
            topic,
            mood,
            time_spent,
            entries: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn find_entry(&self, entry_id: &str) -> Option<&VocabEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    /// Entries matching `filter`, paired with their position in the full list
    pub fn filtered_entries(&self, filter: EntryFilter) -> Vec<(usize, &VocabEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| filter.matches(e))
            .collect()
    }

    pub fn mastery_progress(&self) -> MasteryProgress {
        let mastered = self.entries.iter().filter(|e| e.mastered).count();
        MasteryProgress::new(mastered, self.entries.len())
    }
}

/// Filter applied when browsing a session's entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryFilter {
    #[default]
    All,
    Mastered,
    Unmastered,
}

impl EntryFilter {
    pub fn matches(&self, entry: &VocabEntry) -> bool {
        match self {
            EntryFilter::All => true,
            EntryFilter::Mastered => entry.mastered,
            EntryFilter::Unmastered => !entry.mastered,
        }
    }
}

impl FromStr for EntryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(EntryFilter::All),
            "mastered" => Ok(EntryFilter::Mastered),
            "unmastered" => Ok(EntryFilter::Unmastered),
            other => Err(format!(
                "unknown filter '{}' (expected all, mastered or unmastered)",
                other
            )),
        }
    }
}

/// Encouragement shown once enough of a session is mastered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Milestone {
    OverHalfway,
    AllMastered,
}

impl Milestone {
    pub fn message(&self) -> &'static str {
        match self {
            Milestone::OverHalfway => "Nice progress! Over halfway there.",
            Milestone::AllMastered => "All words in this session mastered!",
        }
    }
}

/// Mastered/total counts for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryProgress {
    pub mastered: usize,
    pub total: usize,
}

impl MasteryProgress {
    pub fn new(mastered: usize, total: usize) -> Self {
        Self { mastered, total }
    }

    /// Fraction mastered, 0.0 for an empty session
    pub fn ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.mastered as f32 / self.total as f32
        }
    }

    pub fn milestone(&self) -> Option<Milestone> {
        if self.total == 0 {
            return None;
        }
        // Integer comparisons keep the 50% boundary exact
        if self.mastered >= self.total {
            Some(Milestone::AllMastered)
        } else if self.mastered * 2 >= self.total {
            Some(Milestone::OverHalfway)
        } else {
            None
        }
    }
}

/// Request to create a new session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub topic: String,
    pub date: NaiveDate,
    pub mood: Mood,
    pub time_spent: u32,
}

/// Partial update of a session's header fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub topic: Option<String>,
    pub date: Option<NaiveDate>,
    pub mood: Option<Mood>,
    pub time_spent: Option<u32>,
}

/// Partial update of an entry; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub word: Option<String>,
    pub meaning: Option<String>,
    #[serde(rename = "fn")]
    pub part_of_speech: Option<PartOfSpeech>,
    pub example: Option<String>,
    pub note: Option<String>,
    pub mastered: Option<bool>,
    pub pronunciation_accent: Option<Accent>,
    pub transcript: Option<String>,
    pub ipa: Option<String>,
    pub practice_rating: Option<PracticeRating>,
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

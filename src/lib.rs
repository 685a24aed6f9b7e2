//! Vocab Log: a personal vocabulary notebook.
//!
//! Sessions of word entries are kept in a small key-value store, drilled with a
//! flashcard-style practice run, and backed by a daily study streak.

pub mod playback;
pub mod practice;
pub mod settings;
pub mod storage;
pub mod streak;
pub mod vocab;

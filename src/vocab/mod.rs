//! Vocabulary sessions for Vocab Log
//!
//! This module provides:
//! - Session and entry models (mood, part of speech, practice rating)
//! - Session/entry CRUD over the key-value store
//! - JSON backup/restore and CSV export

pub mod backup;
pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{SessionStore, SESSIONS_KEY};

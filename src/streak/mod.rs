//! Study streak tracking

pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{current_streak, longest_streak, StreakTracker, STREAK_KEY};

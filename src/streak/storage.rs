//! Study-day recording and streak calculation

use chrono::{Local, NaiveDate};

use super::models::*;
use crate::storage::{KeyValueStore, Result};

/// Key holding the serialized streak record
pub const STREAK_KEY: &str = "vocab-log-streak";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the streak ending today or yesterday
///
/// Duplicates and ordering in `dates` do not matter. A most recent day older
/// than yesterday means the streak is broken and counts as 0.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut days = dates.to_vec();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let Some(&most_recent) = days.first() else {
        return 0;
    };
    if most_recent != today && Some(most_recent) != today.pred_opt() {
        return 0;
    }

    let mut streak = 1;
    for pair in days.windows(2) {
        if pair[0].pred_opt() == Some(pair[1]) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Longest run of consecutive days anywhere in `dates`
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let mut days = dates.to_vec();
    days.sort_unstable();
    days.dedup();

    if days.is_empty() {
        return 0;
    }

    let mut longest = 1;
    let mut current = 1;
    for pair in days.windows(2) {
        if pair[0].succ_opt() == Some(pair[1]) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }
    longest
}

/// Records study days and answers streak queries
pub struct StreakTracker<S> {
    store: S,
}

impl<S: KeyValueStore> StreakTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the stored record; absent or malformed data reads as empty
    pub fn load_record(&self) -> StreakRecord {
        let Some(raw) = self.store.get(STREAK_KEY) else {
            return StreakRecord::default();
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed streak data: {}", e);
            StreakRecord::default()
        })
    }

    /// Record today (local calendar day) as a study day
    pub fn record_study_day(&mut self) -> Result<bool> {
        self.record_study_day_on(Local::now().date_naive())
    }

    /// Record `day` as a study day
    ///
    /// Returns `false` without writing when the day is already recorded.
    pub fn record_study_day_on(&mut self, day: NaiveDate) -> Result<bool> {
        let mut record = self.load_record();
        let day = day.format(DATE_FORMAT).to_string();

        if record.contains(&day) {
            return Ok(false);
        }

        record.dates.push(day);
        let json = serde_json::to_string(&record)?;
        self.store.set(STREAK_KEY, &json)?;
        Ok(true)
    }

    /// Parsed study days in stored order, skipping unreadable entries
    pub fn study_days(&self) -> Vec<NaiveDate> {
        self.load_record()
            .dates
            .iter()
            .filter_map(|raw| match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(day) => Some(day),
                Err(e) => {
                    log::warn!("Skipping unreadable study day '{}': {}", raw, e);
                    None
                }
            })
            .collect()
    }

    pub fn streak_count(&self) -> u32 {
        self.streak_count_on(Local::now().date_naive())
    }

    pub fn streak_count_on(&self, today: NaiveDate) -> u32 {
        current_streak(&self.study_days(), today)
    }

    pub fn longest_streak(&self) -> u32 {
        longest_streak(&self.study_days())
    }

    pub fn stats(&self) -> StreakStats {
        self.stats_on(Local::now().date_naive())
    }

    pub fn stats_on(&self, today: NaiveDate) -> StreakStats {
        let mut days = self.study_days();
        let current = current_streak(&days, today);
        let longest = longest_streak(&days);
        let studied_today = days.contains(&today);
        days.sort_unstable();
        days.dedup();

        StreakStats {
            current,
            longest,
            total_days: days.len(),
            studied_today,
        }
    }
}

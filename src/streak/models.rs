//! Data models for study streaks

use serde::{Deserialize, Serialize};

/// Every calendar day the learner studied, as `YYYY-MM-DD` strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    #[serde(default)]
    pub dates: Vec<String>,
}

impl StreakRecord {
    pub fn contains(&self, day: &str) -> bool {
        self.dates.iter().any(|d| d == day)
    }
}

/// Summary shown by the `streak` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    pub current: u32,
    pub longest: u32,
    pub total_days: usize,
    pub studied_today: bool,
}

/// Banner text for a streak, or nothing when there is no active streak
pub fn streak_message(streak: u32) -> Option<String> {
    match streak {
        0 => None,
        1 => Some("You've studied vocabulary 1 day today. Keep it up!".to_string()),
        n => Some(format!(
            "You've studied vocabulary {} days in a row. Keep it up!",
            n
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_message() {
        assert_eq!(streak_message(0), None);
        assert_eq!(
            streak_message(1).unwrap(),
            "You've studied vocabulary 1 day today. Keep it up!"
        );
        assert_eq!(
            streak_message(4).unwrap(),
            "You've studied vocabulary 4 days in a row. Keep it up!"
        );
    }

    #[test]
    fn test_record_shape() {
        let record: StreakRecord =
            serde_json::from_str(r#"{"dates":["2024-03-01","2024-03-02"]}"#).unwrap();
        assert!(record.contains("2024-03-02"));
        assert!(!record.contains("2024-03-03"));

        let empty: StreakRecord = serde_json::from_str("{}").unwrap();
        assert!(empty.dates.is_empty());
    }
}

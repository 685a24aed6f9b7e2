use anyhow::Result;

use vocab_log_lib::streak::streak_message;

use crate::app::{short_id, App};
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    app.record_study_day();

    let sessions = app.sessions.list_sessions_by_date();
    let streak = app.streak.streak_count();

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = sessions
                .iter()
                .map(|s| {
                    let progress = s.mastery_progress();
                    serde_json::json!({
                        "id": s.id,
                        "date": s.date,
                        "topic": s.topic,
                        "mood": s.mood,
                        "timeSpent": s.time_spent,
                        "entryCount": progress.total,
                        "masteredCount": progress.mastered,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "streak": streak,
                    "sessions": output,
                }))?
            );
        }
        OutputFormat::Plain => {
            if let Some(message) = streak_message(streak) {
                println!("{}", terminal::paint(&message, Color::YELLOW, use_color));
                println!();
            }

            if sessions.is_empty() {
                println!("No sessions yet. Create one with `vocab-log new <topic>`");
                return Ok(());
            }

            for session in &sessions {
                let progress = session.mastery_progress();
                println!(
                    "{}  {}  {} {} min  {}/{} mastered  {}",
                    session.date,
                    terminal::paint(&session.topic, Color::BOLD, use_color),
                    terminal::mood_icon(session.mood),
                    session.time_spent,
                    progress.mastered,
                    progress.total,
                    terminal::paint(short_id(&session.id), Color::GRAY, use_color),
                );
            }
        }
    }

    Ok(())
}

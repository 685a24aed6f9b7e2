use anyhow::{Context, Result};
use chrono::NaiveDate;

use vocab_log_lib::vocab::{CreateSessionRequest, Mood};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    topic: &str,
    date: Option<NaiveDate>,
    mood: Mood,
    minutes: u32,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

    let session = app
        .sessions
        .create_session(CreateSessionRequest {
            topic: topic.to_string(),
            date,
            mood,
            time_spent: minutes,
        })
        .context("Failed to create session")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        OutputFormat::Plain => {
            println!(
                "Created session \"{}\" on {}",
                terminal::paint(&session.topic, Color::BOLD, use_color),
                session.date
            );
            println!("  Mood: {} {}", session.mood, terminal::mood_icon(session.mood));
            println!("  Time: {} min", session.time_spent);
            println!("  ID: {}", session.id);
        }
    }

    Ok(())
}

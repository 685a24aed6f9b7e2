use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &mut App, query: &str, format: &OutputFormat) -> Result<()> {
    let session = app.find_session(query)?;

    app.sessions
        .delete_session(&session.id)
        .context("Failed to delete session")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": session.id,
                "topic": session.topic,
                "deletedEntries": session.entries.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Deleted session \"{}\" ({})",
                session.topic,
                terminal::plural(session.entries.len(), "entry", "entries")
            );
        }
    }

    Ok(())
}

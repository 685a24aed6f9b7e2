use anyhow::Result;

use vocab_log_lib::streak::streak_message;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats = app.streak.stats();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            match streak_message(stats.current) {
                Some(message) => println!("{}", terminal::paint(&message, Color::YELLOW, use_color)),
                None => println!("No active streak. Practice today to start one."),
            }
            println!(
                "  Longest streak: {}",
                terminal::plural(stats.longest as usize, "day", "days")
            );
            println!("  Days studied: {}", stats.total_days);
            if !stats.studied_today && stats.current > 0 {
                println!("  Study today to keep it going.");
            }
        }
    }

    Ok(())
}

use anyhow::Result;

use vocab_log_lib::vocab::{EntryFilter, VocabEntry};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    query: &str,
    filter: EntryFilter,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let session = app.find_session(query)?;
    let progress = session.mastery_progress();
    let entries = session.filtered_entries(filter);

    if let OutputFormat::Json = format {
        let output = serde_json::json!({
            "id": session.id,
            "date": session.date,
            "topic": session.topic,
            "mood": session.mood,
            "timeSpent": session.time_spent,
            "progress": progress,
            "milestone": progress.milestone(),
            "entries": entries
                .iter()
                .map(|(i, e)| serde_json::json!({ "number": i + 1, "entry": e }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", terminal::paint(&session.topic, Color::BOLD, use_color));
    println!(
        "{}",
        terminal::paint(
            &format!(
                "{}  {} {}  {} min",
                session.date,
                session.mood,
                terminal::mood_icon(session.mood),
                session.time_spent
            ),
            Color::DIM,
            use_color
        )
    );
    println!(
        "{} {}/{} mastered",
        terminal::progress_bar(progress.ratio(), 20),
        progress.mastered,
        progress.total
    );

    if let Some(milestone) = progress.milestone() {
        println!("{}", terminal::paint(milestone.message(), Color::GREEN, use_color));
    }
    println!();

    if entries.is_empty() {
        match filter {
            EntryFilter::All => println!("No entries yet. Add one with `vocab-log add`"),
            EntryFilter::Mastered => println!("No mastered entries"),
            EntryFilter::Unmastered => println!("No unmastered entries"),
        }
        return Ok(());
    }

    for (i, entry) in entries {
        print_entry(i + 1, entry, use_color);
    }

    Ok(())
}

fn print_entry(number: usize, entry: &VocabEntry, use_color: bool) {
    let check = if entry.mastered { "[x]" } else { "[ ]" };
    let word = if entry.word.trim().is_empty() {
        terminal::paint("(empty)", Color::GRAY, use_color)
    } else {
        terminal::paint(&entry.word, Color::BOLD, use_color)
    };

    let mut header = format!("{:>3}. {} {}", number, check, word);
    if entry.part_of_speech.is_specified() {
        header.push_str(&format!(" ({})", entry.part_of_speech));
    }
    if let Some(pronunciation) = entry.pronunciation_line() {
        header.push_str(&format!("  {}", pronunciation));
    }
    if let Some(rating) = entry.practice_rating {
        header.push_str(&format!(
            "  {}",
            terminal::paint(rating.label(), terminal::rating_color(rating), use_color)
        ));
    }
    println!("{}", header);

    if !entry.meaning.is_empty() {
        println!("       {}", entry.meaning);
    }
    if !entry.example.is_empty() {
        println!("       {}", terminal::paint(&entry.example, Color::ITALIC, use_color));
    }
    if !entry.note.is_empty() {
        println!("       {}", terminal::paint(&entry.note, Color::DIM, use_color));
    }
}

use std::io::{self, BufRead, Write};

use anyhow::Result;

use vocab_log_lib::playback::{pronounce, CommandSpeaker, PlaybackStatus, Speaker};
use vocab_log_lib::practice::{PracticeError, PracticeRun, PracticeState, RatingSink, Tally};
use vocab_log_lib::vocab::{Accent, PracticeRating};

use crate::app::App;
use crate::render::terminal::{self, Color};

pub fn run(app: &mut App, query: &str, accent: Option<Accent>, use_color: bool) -> Result<()> {
    let session = app.find_session(query)?;
    let accent = accent.unwrap_or(app.settings.accent);

    app.record_study_day();

    let practice = match PracticeRun::start(&session, accent) {
        Ok(practice) => practice,
        Err(PracticeError::EmptyPool) => {
            println!(
                "No words to practice in \"{}\". Add some with `vocab-log add`",
                session.topic
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let speaker = CommandSpeaker::new(app.settings.speech.clone());
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    drive(
        practice,
        &mut app.sessions,
        &speaker,
        &mut input,
        &mut output,
        use_color,
    )
}

/// Run the card loop until the learner quits or input ends
fn drive<K, R, W>(
    mut practice: PracticeRun,
    sink: &mut K,
    speaker: &dyn Speaker,
    input: &mut R,
    output: &mut W,
    use_color: bool,
) -> Result<()>
where
    K: RatingSink,
    R: BufRead,
    W: Write,
{
    let mut shown: Option<PracticeState> = None;

    loop {
        let state = practice.state();
        if shown != Some(state) {
            print_state(&practice, output, use_color)?;
            shown = Some(state);
        }

        let prompt_text = match state {
            PracticeState::Reviewing { revealed: false, .. } => "Enter: reveal, s: say, q: quit > ",
            PracticeState::Reviewing { revealed: true, .. } => {
                "(g)ot it, (a)lmost, (f)orgot, s: say, q: quit > "
            }
            PracticeState::Finished(_) => "r: practice again, q: quit > ",
        };

        let Some(command) = prompt(input, output, prompt_text)? else {
            writeln!(output)?;
            break;
        };

        match (state, command.as_str()) {
            (_, "q" | "quit") => break,
            (PracticeState::Reviewing { .. }, "s" | "say") => say_current(&practice, speaker, output)?,
            (PracticeState::Reviewing { revealed: false, .. }, _) => practice.reveal()?,
            (PracticeState::Reviewing { revealed: true, .. }, rating) => {
                match rating.parse::<PracticeRating>() {
                    Ok(rating) => {
                        practice.rate(rating, sink)?;
                    }
                    Err(e) => writeln!(output, "{}", e)?,
                }
            }
            (PracticeState::Finished(_), "r" | "restart") => practice.restart()?,
            (PracticeState::Finished(_), _) => break,
        }
    }

    practice.exit();
    Ok(())
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

fn print_state<W: Write>(practice: &PracticeRun, output: &mut W, use_color: bool) -> Result<()> {
    if let PracticeState::Finished(tally) = practice.state() {
        return print_tally(&tally, output, use_color);
    }

    let Some(card) = practice.current_card() else {
        return Ok(());
    };

    if card.meaning.is_none() {
        if let Some((position, total)) = practice.position() {
            writeln!(output)?;
            writeln!(
                output,
                "{} {}/{}",
                terminal::progress_bar(practice.completed_fraction(), 20),
                position,
                total
            )?;
        }

        let mut line = format!("  {}", terminal::paint(card.word, Color::BOLD, use_color));
        if card.part_of_speech.is_specified() {
            line.push_str(&format!(" ({})", card.part_of_speech));
        }
        if let Some(pronunciation) = &card.pronunciation {
            line.push_str(&format!("  {}", terminal::paint(pronunciation, Color::GRAY, use_color)));
        }
        writeln!(output, "{}", line)?;
    } else {
        if let Some(meaning) = card.meaning {
            let meaning = if meaning.is_empty() { MISSING_MEANING } else { meaning };
            writeln!(output, "  {}", terminal::paint(meaning, Color::CYAN, use_color))?;
        }
        if let Some(example) = card.example {
            writeln!(output, "  {}", terminal::paint(example, Color::ITALIC, use_color))?;
        }
    }

    Ok(())
}

const MISSING_MEANING: &str = "—";

fn print_tally<W: Write>(tally: &Tally, output: &mut W, use_color: bool) -> Result<()> {
    writeln!(output)?;
    writeln!(
        output,
        "{} {}",
        terminal::paint("Practice complete!", Color::BOLD, use_color),
        terminal::plural(tally.total(), "card", "cards")
    )?;
    for rating in PracticeRating::ALL {
        writeln!(
            output,
            "  {}: {}",
            terminal::paint(rating.label(), terminal::rating_color(rating), use_color),
            tally.count(rating)
        )?;
    }
    Ok(())
}

fn say_current<W: Write>(practice: &PracticeRun, speaker: &dyn Speaker, output: &mut W) -> Result<()> {
    let Some(entry) = practice.current_entry() else {
        return Ok(());
    };
    let accent = entry.pronunciation_accent.unwrap_or(practice.accent());

    if pronounce(speaker, &entry.word, accent) == PlaybackStatus::Unsupported {
        writeln!(output, "Speech playback is not available")?;
    }
    Ok(())
}

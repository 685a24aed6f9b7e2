mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use vocab_log_lib::vocab::{Accent, EntryFilter, Mood};

use commands::backup::ExportKind;
use commands::entry::EntryArgs;

#[derive(Parser)]
#[command(name = "vocab-log", about = "Vocabulary notebook with practice and study streaks", version)]
struct Cli {
    /// Data directory (default: platform data directory)
    #[arg(long, global = true, env = "VOCAB_LOG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List study sessions, most recent first
    List,

    /// Create a new study session
    New {
        /// Session topic
        topic: String,
        /// Study date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// happy, neutral or tired
        #[arg(long, default_value = "happy")]
        mood: Mood,
        /// Minutes spent
        #[arg(long, default_value = "30")]
        minutes: u32,
    },

    /// Show a session and its entries
    Show {
        /// Session id or topic (case-insensitive prefix match)
        session: String,
        /// all, mastered or unmastered
        #[arg(long, default_value = "all")]
        filter: EntryFilter,
    },

    /// Delete a session and all of its entries
    Delete {
        /// Session id or topic
        session: String,
    },

    /// Add a word or phrase to a session
    Add {
        /// Session id or topic
        session: String,
        /// Word or phrase
        word: String,
        #[command(flatten)]
        fields: EntryArgs,
    },

    /// Edit an entry by its number in `show`
    Edit {
        /// Session id or topic
        session: String,
        /// Entry number (1-based)
        number: usize,
        /// New word or phrase
        #[arg(long)]
        word: Option<String>,
        #[command(flatten)]
        fields: EntryArgs,
        /// Mark as mastered
        #[arg(long, conflicts_with = "unmastered")]
        mastered: bool,
        /// Mark as not mastered
        #[arg(long)]
        unmastered: bool,
    },

    /// Remove an entry by its number in `show`
    Rm {
        /// Session id or topic
        session: String,
        /// Entry number (1-based)
        number: usize,
    },

    /// Practice a session's entries as flashcards
    Practice {
        /// Session id or topic
        session: String,
        /// US or UK (default: from settings)
        #[arg(long)]
        accent: Option<Accent>,
    },

    /// Pronounce a word
    Say {
        /// Word or phrase
        word: String,
        /// US or UK (default: from settings)
        #[arg(long)]
        accent: Option<Accent>,
    },

    /// Show the current and longest study streak
    Streak,

    /// Export all sessions
    Export {
        /// json (full backup) or csv (one row per entry)
        kind: ExportKind,
        /// Output file or directory (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace all sessions with a JSON backup
    Import {
        /// Backup file
        file: PathBuf,
    },

    /// Show or change settings
    Config {
        /// Default accent, US or UK
        #[arg(long)]
        accent: Option<Accent>,
        /// Speech program used for pronunciation (empty to disable)
        #[arg(long)]
        speech_command: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::List => {
            commands::list::run(&mut app, &cli.format, use_color)?;
        }
        Command::New { topic, date, mood, minutes } => {
            commands::new::run(&mut app, &topic, date, mood, minutes, &cli.format, use_color)?;
        }
        Command::Show { session, filter } => {
            commands::show::run(&app, &session, filter, &cli.format, use_color)?;
        }
        Command::Delete { session } => {
            commands::delete::run(&mut app, &session, &cli.format)?;
        }
        Command::Add { session, word, fields } => {
            commands::entry::run_add(&mut app, &session, word, fields, &cli.format)?;
        }
        Command::Edit { session, number, word, fields, mastered, unmastered } => {
            let mastered = match (mastered, unmastered) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::entry::run_edit(&mut app, &session, number, word, fields, mastered, &cli.format)?;
        }
        Command::Rm { session, number } => {
            commands::entry::run_rm(&mut app, &session, number, &cli.format)?;
        }
        Command::Practice { session, accent } => {
            commands::practice::run(&mut app, &session, accent, use_color)?;
        }
        Command::Say { word, accent } => {
            commands::say::run(&app, &word, accent)?;
        }
        Command::Streak => {
            commands::streak::run(&app, &cli.format, use_color)?;
        }
        Command::Export { kind, output } => {
            commands::backup::run_export(&app, kind, output.as_deref())?;
        }
        Command::Import { file } => {
            commands::backup::run_import(&mut app, &file, &cli.format)?;
        }
        Command::Config { accent, speech_command } => {
            commands::config::run(&mut app, accent, speech_command, &cli.format)?;
        }
    }

    Ok(())
}

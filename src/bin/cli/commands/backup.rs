use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use vocab_log_lib::vocab::backup::{backup_file_name, csv_file_name};

use crate::app::App;
use crate::OutputFormat;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ExportKind {
    Json,
    Csv,
}

/// Write an export to `output`, or stdout when no output is given
///
/// A directory output gets the dated default file name.
pub fn run_export(app: &App, kind: ExportKind, output: Option<&Path>) -> Result<()> {
    let content = match kind {
        ExportKind::Json => app.sessions.export_json(),
        ExportKind::Csv => app.sessions.export_csv(),
    }
    .context("Failed to export sessions")?;

    let Some(output) = output else {
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
        return Ok(());
    };

    let path = export_path(output, kind);
    fs::write(&path, &content).with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Exported {} sessions to {}", app.sessions.list_sessions().len(), path.display());
    Ok(())
}

pub fn run_import(app: &mut App, file: &Path, format: &OutputFormat) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let sessions = app
        .sessions
        .import_json(&content)
        .with_context(|| format!("Invalid backup file {}; nothing was imported", file.display()))?;

    let entries: usize = sessions.iter().map(|s| s.entries.len()).sum();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "sessions": sessions.len(),
                "entries": entries,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Imported {} sessions ({} entries) from {}",
                sessions.len(),
                entries,
                file.display()
            );
        }
    }

    Ok(())
}

fn export_path(output: &Path, kind: ExportKind) -> PathBuf {
    if !output.is_dir() {
        return output.to_path_buf();
    }
    let today = chrono::Local::now().date_naive();
    let name = match kind {
        ExportKind::Json => backup_file_name(today),
        ExportKind::Csv => csv_file_name(today),
    };
    output.join(name)
}

//! `distil distill` command - distill a journal file into a ledger entry
//!
//! Example usage:
//! - `distil distill journal/private/2026-02-19-review.md`
//! - `distil distill review.md --title "Pause First" --confidence high --dry-run`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use distil_core::config::LedgerConfig;
use distil_core::error::{DistilError, Result};
use distil_core::extract::{extract_fields, Confidence, FieldOverrides};
use distil_core::ledger::Ledger;

/// Execute the distill command
pub fn execute(
    cli: &Cli,
    config: &LedgerConfig,
    journal: &Path,
    title: Option<&str>,
    confidence: Option<&str>,
    tags: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let start = Instant::now();

    let path = resolve_journal(config, journal)?;
    let body = fs::read_to_string(&path)?;

    if cli.verbose {
        debug!(path = %path.display(), body_len = body.len(), "read_journal");
    }

    let confidence = match confidence {
        Some(raw) => Some(raw.parse::<Confidence>()?),
        None => None,
    };
    let overrides = FieldOverrides {
        title: title.map(str::to_string),
        confidence,
        tags: tags.map(str::to_string),
    };

    let source = config
        .relative_to_workspace(&path)
        .display()
        .to_string();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let fields = extract_fields(&file_name, &source, &body, &overrides);
    let entry = fields.render();

    if dry_run {
        return report_dry_run(cli, config, &path, &entry, &fields);
    }

    let ledger = Ledger::new(config.clone());
    let outcome = ledger.append(&entry)?;

    if cli.verbose {
        debug!(identity = %outcome.identity, elapsed = ?start.elapsed(), "append_entry");
    }

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "source": path.display().to_string(),
                "ledger": config.ledger_path.display().to_string(),
                "identity": outcome.identity,
                "retained": outcome.retained,
                "archived": outcome.archived,
                "dropped": outcome.dropped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("Source: {}", path.display());
            println!("Distilled to {}", config.ledger_path.display());
            if !cli.quiet && outcome.archived > 0 {
                println!("Archived {} pinned entries", outcome.archived);
            }
        }
    }

    Ok(())
}

fn report_dry_run(
    cli: &Cli,
    config: &LedgerConfig,
    path: &Path,
    entry: &str,
    fields: &distil_core::extract::EntryFields,
) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "dry_run": true,
                "source": path.display().to_string(),
                "ledger": config.ledger_path.display().to_string(),
                "fields": fields,
                "entry": entry,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!("[dry-run] Source: {}", path.display());
                println!("[dry-run] Destination: {}", config.ledger_path.display());
                println!();
            }
            println!("{}", entry);
        }
    }
    Ok(())
}

/// Resolve the journal argument: as given, or relative to the workspace
fn resolve_journal(config: &LedgerConfig, journal: &Path) -> Result<PathBuf> {
    if journal.is_file() {
        return Ok(journal.to_path_buf());
    }
    if journal.is_relative() {
        let candidate = config.workspace.join(journal);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(DistilError::JournalNotFound {
        path: journal.to_path_buf(),
    })
}

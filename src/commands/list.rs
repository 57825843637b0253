//! `distil list` command - list ledger or archive entries

use crate::cli::{Cli, OutputFormat};
use distil_core::config::LedgerConfig;
use distil_core::entry::Entry;
use distil_core::error::Result;
use distil_core::ledger::Ledger;

/// Execute the list command
pub fn execute(cli: &Cli, config: &LedgerConfig, archive: bool) -> Result<()> {
    let ledger = Ledger::new(config.clone());
    let entries = if archive {
        ledger.archive_entries()?
    } else {
        ledger.entries()?
    };

    match cli.format {
        OutputFormat::Json => {
            let items: Vec<serde_json::Value> =
                entries.iter().map(|e| entry_json(config, e)).collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Human => {
            for entry in &entries {
                println!("{}", entry_line(config, entry));
            }
            if !cli.quiet {
                let tier = if archive { "archive" } else { "ledger" };
                eprintln!("{} entries in {}", entries.len(), tier);
            }
        }
    }

    Ok(())
}

fn entry_line(config: &LedgerConfig, entry: &Entry) -> String {
    let date = entry.date().unwrap_or("----------");
    let title = entry
        .title()
        .or_else(|| entry.as_str().lines().next())
        .unwrap_or_default();
    let source = entry
        .source()
        .map(|s| format!("  ({})", s))
        .unwrap_or_default();
    let pin = if entry.is_pinned(&config.pin_tags) {
        "  [pinned]"
    } else {
        ""
    };
    format!("[{}] {}{}{}", date, title, source, pin)
}

fn entry_json(config: &LedgerConfig, entry: &Entry) -> serde_json::Value {
    serde_json::json!({
        "date": entry.date(),
        "title": entry.title(),
        "source": entry.source(),
        "tags": entry.tags().into_iter().collect::<Vec<_>>(),
        "pinned": entry.is_pinned(&config.pin_tags),
        "identity": entry.identity(),
    })
}

//! `distil compact` command - re-run dedup and eviction without appending
//!
//! Useful after lowering the capacity bound or pin tag set: the next
//! append would compact anyway, but this applies the new bounds now.

use crate::cli::{Cli, OutputFormat};
use distil_core::config::LedgerConfig;
use distil_core::error::Result;
use distil_core::ledger::Ledger;

/// Execute the compact command
pub fn execute(cli: &Cli, config: &LedgerConfig) -> Result<()> {
    let ledger = Ledger::new(config.clone());
    let outcome = ledger.compact_now()?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "ledger": config.ledger_path.display().to_string(),
                "retained": outcome.retained,
                "archived": outcome.archived,
                "dropped": outcome.dropped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!(
                "Retained {} entries ({} archived, {} dropped)",
                outcome.retained, outcome.archived, outcome.dropped
            );
        }
    }

    Ok(())
}

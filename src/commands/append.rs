//! `distil append` command - append an already-rendered entry from stdin
//!
//! The entry block is the input boundary of the retention engine: a dated
//! heading, field lines, source reference, and tag list. Upstream tooling
//! can pipe a block straight in:
//!
//! - `render-entry | distil append`
//! - `distil append < entry.md`

use std::io::{self, Read};
use std::time::Instant;

use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use distil_core::config::LedgerConfig;
use distil_core::error::{DistilError, Result};
use distil_core::ledger::Ledger;

/// Execute the append command
pub fn execute(cli: &Cli, config: &LedgerConfig) -> Result<()> {
    let start = Instant::now();

    let mut entry = String::new();
    io::stdin().read_to_string(&mut entry)?;
    let entry = entry.trim();

    if entry.is_empty() {
        return Err(DistilError::UsageError(
            "no entry provided on stdin".to_string(),
        ));
    }

    if cli.verbose {
        debug!(entry_len = entry.len(), "read_stdin");
    }

    let ledger = Ledger::new(config.clone());
    let outcome = ledger.append(entry)?;

    if cli.verbose {
        debug!(identity = %outcome.identity, elapsed = ?start.elapsed(), "append_entry");
    }

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "identity": outcome.identity,
                "ledger": config.ledger_path.display().to_string(),
                "retained": outcome.retained,
                "archived": outcome.archived,
                "dropped": outcome.dropped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("{}", outcome.identity);
        }
    }

    Ok(())
}

//! Command dispatch for the distil CLI
//!
//! Resolves the ledger configuration once from global flags and their
//! environment fallbacks, then routes to the subcommand.

use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands;
use distil_core::config::LedgerConfig;
use distil_core::error::Result;

/// Route the parsed CLI to its command
pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let config = ledger_config(cli);
    tracing::debug!(
        ledger = %config.ledger_path.display(),
        archive = %config.archive_path.display(),
        max_entries = config.max_entries,
        "resolved config"
    );

    match &cli.command {
        Commands::Distill {
            journal,
            title,
            confidence,
            tags,
            dry_run,
        } => commands::distill::execute(
            cli,
            &config,
            journal,
            title.as_deref(),
            confidence.as_deref(),
            tags.as_deref(),
            *dry_run,
        )?,
        Commands::Append => commands::append::execute(cli, &config)?,
        Commands::List { archive } => commands::list::execute(cli, &config, *archive)?,
        Commands::Compact => commands::compact::execute(cli, &config)?,
        Commands::New {
            title,
            visibility,
            date,
        } => commands::new::execute(cli, &config, title, *visibility, date.as_deref())?,
    }

    tracing::debug!(elapsed = ?start.elapsed(), "execute_command");
    Ok(())
}

/// Build the ledger configuration from global flags
fn ledger_config(cli: &Cli) -> LedgerConfig {
    let workspace = cli
        .workspace
        .clone()
        .unwrap_or_else(LedgerConfig::default_workspace);
    let mut config = LedgerConfig::new(workspace);

    if let Some(ledger) = &cli.ledger {
        config = config.with_ledger_path(ledger);
    }
    if let Some(archive) = &cli.archive {
        config = config.with_archive_path(archive);
    }
    if let Some(max_entries) = cli.max_entries {
        config = config.with_max_entries(max_entries);
    }
    if let Some(pin_tags) = &cli.pin_tags {
        config = config.with_pin_tags(pin_tags);
    }

    config
}

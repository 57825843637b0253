//! `distil new` command - create a journal post from a template

use crate::cli::{Cli, OutputFormat};
use distil_core::config::LedgerConfig;
use distil_core::error::Result;
use distil_core::post::{create_post, Visibility};

/// Execute the new command
pub fn execute(
    cli: &Cli,
    config: &LedgerConfig,
    title: &str,
    visibility: Visibility,
    date: Option<&str>,
) -> Result<()> {
    let path = create_post(&config.workspace, visibility, title, date)?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": path.display().to_string(),
                "visibility": visibility.as_str(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("{}", path.display());
        }
    }

    Ok(())
}

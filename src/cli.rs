//! CLI argument parsing for distil
//!
//! Global flags resolve the ledger configuration: workspace root, document
//! paths, capacity bound, and pin tags, each with an environment fallback.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use distil_core::post::Visibility;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text for people
    #[default]
    Human,
    /// One JSON object per command
    Json,
}

/// Distil - journal distillation ledger CLI
#[derive(Parser, Debug)]
#[command(name = "distil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Workspace root holding journals and ledger documents
    #[arg(long, global = true, env = "DISTIL_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Explicit ledger document path
    #[arg(long, global = true, env = "DISTIL_LEDGER")]
    pub ledger: Option<PathBuf>,

    /// Explicit archive document path
    #[arg(long, global = true, env = "DISTIL_ARCHIVE")]
    pub archive: Option<PathBuf>,

    /// Maximum entries retained in the ledger
    #[arg(long, global = true, env = "DISTIL_MAX_ENTRIES")]
    pub max_entries: Option<usize>,

    /// Comma-separated tags exempting entries from discard
    #[arg(long, global = true, env = "DISTIL_PIN_TAGS")]
    pub pin_tags: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing and debug detail
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Distill a journal file into a ledger entry
    Distill {
        /// Source journal path (absolute, or relative to the workspace)
        journal: PathBuf,

        /// Override the realization title
        #[arg(long, short = 't')]
        title: Option<String>,

        /// Override the confidence level (low, medium, high)
        #[arg(long, short = 'c')]
        confidence: Option<String>,

        /// Comma-separated tags, e.g. communication,boundaries
        #[arg(long)]
        tags: Option<String>,

        /// Show the generated entry without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Append an already-rendered entry block from stdin
    Append,

    /// List ledger entries
    List {
        /// List the archive tier instead of the ledger
        #[arg(long)]
        archive: bool,
    },

    /// Re-run dedup and eviction without appending
    Compact,

    /// Create a new journal post from a template
    New {
        /// Post title
        title: String,

        /// Post visibility (private or public)
        #[arg(long, default_value = "private", value_parser = parse_visibility)]
        visibility: Visibility,

        /// Post date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
}

/// Parse post visibility from string
fn parse_visibility(s: &str) -> Result<Visibility, String> {
    s.parse::<Visibility>().map_err(|e| e.to_string())
}

// Implement ValueEnum for OutputFormat to work with clap
impl ValueEnum for OutputFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[OutputFormat::Human, OutputFormat::Json]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            OutputFormat::Human => Some(clap::builder::PossibleValue::new("human")),
            OutputFormat::Json => Some(clap::builder::PossibleValue::new("json")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_help() {
        let result = Cli::try_parse_from(["distil", "--help"]);
        assert!(result.is_err()); // --help exits
    }

    #[test]
    fn test_parse_distill() {
        let cli = Cli::try_parse_from(["distil", "distill", "journal/private/a.md"]).unwrap();
        if let Commands::Distill { journal, dry_run, .. } = cli.command {
            assert_eq!(journal, PathBuf::from("journal/private/a.md"));
            assert!(!dry_run);
        } else {
            panic!("Expected Distill command");
        }
    }

    #[test]
    fn test_parse_distill_with_overrides() {
        let cli = Cli::try_parse_from([
            "distil",
            "distill",
            "a.md",
            "--title",
            "My Title",
            "--confidence",
            "high",
            "--tags",
            "focus,boundaries",
            "--dry-run",
        ])
        .unwrap();
        if let Commands::Distill {
            title,
            confidence,
            tags,
            dry_run,
            ..
        } = cli.command
        {
            assert_eq!(title.as_deref(), Some("My Title"));
            assert_eq!(confidence.as_deref(), Some("high"));
            assert_eq!(tags.as_deref(), Some("focus,boundaries"));
            assert!(dry_run);
        } else {
            panic!("Expected Distill command");
        }
    }

    #[test]
    fn test_parse_list_archive() {
        let cli = Cli::try_parse_from(["distil", "list", "--archive"]).unwrap();
        assert!(matches!(cli.command, Commands::List { archive: true }));
    }

    #[test]
    fn test_parse_global_config_flags() {
        let cli = Cli::try_parse_from([
            "distil",
            "--max-entries",
            "5",
            "--pin-tags",
            "keep,forever",
            "list",
        ])
        .unwrap();
        assert_eq!(cli.max_entries, Some(5));
        assert_eq!(cli.pin_tags.as_deref(), Some("keep,forever"));
    }

    #[test]
    fn test_parse_format() {
        let cli = Cli::try_parse_from(["distil", "--format", "json", "list"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_new_with_visibility() {
        let cli = Cli::try_parse_from([
            "distil",
            "new",
            "A Quiet Morning",
            "--visibility",
            "public",
            "--date",
            "2026-02-19",
        ])
        .unwrap();
        if let Commands::New {
            title,
            visibility,
            date,
        } = cli.command
        {
            assert_eq!(title, "A Quiet Morning");
            assert_eq!(visibility, Visibility::Public);
            assert_eq!(date.as_deref(), Some("2026-02-19"));
        } else {
            panic!("Expected New command");
        }
    }
}

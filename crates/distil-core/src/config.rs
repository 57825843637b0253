//! Ledger configuration for distil
//!
//! Configuration is an explicit value passed into the [`Ledger`](crate::ledger::Ledger)
//! constructor. Defaults mirror the environment surface
//! (`DISTIL_WORKSPACE`, `DISTIL_MAX_ENTRIES`, `DISTIL_PIN_TAGS`, `DISTIL_ARCHIVE`);
//! the CLI resolves flags and environment and hands the finished struct here.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default capacity bound for the ledger
pub const DEFAULT_MAX_ENTRIES: usize = 60;

/// Tags that exempt an entry from permanent discard
pub const DEFAULT_PIN_TAGS: &[&str] = &["pinned", "evergreen"];

/// Ledger document file name within the workspace
pub const LEDGER_FILE: &str = "REALIZATIONS.md";

/// Archive document file name within the workspace
pub const ARCHIVE_FILE: &str = "REALIZATIONS_ARCHIVE.md";

/// Header written when creating a fresh ledger document
pub const LEDGER_HEADER: &str = "# REALIZATIONS";

/// Header written when creating a fresh archive document
pub const ARCHIVE_HEADER: &str = "# REALIZATIONS_ARCHIVE";

/// How long an append waits for the ledger lock before failing
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a ledger instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Workspace root; journals are resolved relative to it
    pub workspace: PathBuf,
    /// The capacity-bounded primary document
    pub ledger_path: PathBuf,
    /// The uncapped archive tier for evicted pinned entries
    pub archive_path: PathBuf,
    /// Capacity bound enforced on every append
    pub max_entries: usize,
    /// Lower-cased tags exempting entries from discard
    pub pin_tags: BTreeSet<String>,
    /// Lock acquisition timeout for the read-modify-write cycle
    pub lock_timeout: Duration,
}

impl LedgerConfig {
    /// Build a configuration rooted at the given workspace with default
    /// document names, capacity, and pin tags
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        let workspace = workspace.into();
        LedgerConfig {
            ledger_path: workspace.join(LEDGER_FILE),
            archive_path: workspace.join(ARCHIVE_FILE),
            workspace,
            max_entries: DEFAULT_MAX_ENTRIES,
            pin_tags: default_pin_tags(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// The default workspace root: `~/.distil/workspace`
    pub fn default_workspace() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".distil").join("workspace"))
            .unwrap_or_else(|| PathBuf::from(".distil/workspace"))
    }

    /// Override the ledger document path
    pub fn with_ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ledger_path = path.into();
        self
    }

    /// Override the archive document path
    pub fn with_archive_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_path = path.into();
        self
    }

    /// Override the capacity bound
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Override the pin tag set from a comma-separated list
    pub fn with_pin_tags(mut self, raw: &str) -> Self {
        self.pin_tags = parse_pin_tags(raw);
        self
    }

    /// Express a path relative to the workspace when it lives inside it
    pub fn relative_to_workspace<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.workspace).unwrap_or(path)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig::new(LedgerConfig::default_workspace())
    }
}

/// The built-in pin tag set: `pinned`, `evergreen`
pub fn default_pin_tags() -> BTreeSet<String> {
    DEFAULT_PIN_TAGS.iter().map(|t| t.to_string()).collect()
}

/// Parse a comma-separated pin tag list, lower-casing and dropping blanks
pub fn parse_pin_tags(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

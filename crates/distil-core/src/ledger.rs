//! The ledger: load, append, compact, persist, archive
//!
//! The document file is the only state. Every append is a full
//! read-modify-write cycle executed under an exclusive advisory lock, and
//! every write goes through a temp file renamed into place so a failed
//! write never leaves a half-written document. The archive write happens
//! after the ledger write and is not transactional with it; a crash in
//! between can lose archived entries; callers that need the pair to be
//! transactional must provide it themselves.

use std::fs;
use std::io::Write;
use std::mem;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::compact::{compact, dedupe, CompactionOutcome};
use crate::config::{LedgerConfig, ARCHIVE_HEADER, LEDGER_HEADER};
use crate::document::Document;
use crate::entry::Entry;
use crate::error::Result;
use crate::lock::LedgerLock;

/// Result of appending one entry to the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Identity of the appended entry
    pub identity: String,
    /// Entries retained in the ledger after compaction
    pub retained: usize,
    /// Entries moved to the archive tier
    pub archived: usize,
    /// Entries discarded permanently
    pub dropped: usize,
}

/// The capacity-bounded realization ledger and its archive tier
#[derive(Debug)]
pub struct Ledger {
    config: LedgerConfig,
}

impl Ledger {
    /// Create a ledger over the given configuration
    pub fn new(config: LedgerConfig) -> Self {
        Ledger { config }
    }

    /// The active configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Append a rendered entry block: ensure, load, compact, persist,
    /// and forward evicted pinned entries to the archive
    pub fn append(&self, entry_text: &str) -> Result<AppendOutcome> {
        let _lock = self.acquire_lock()?;

        let entry = Entry::new(entry_text);
        let identity = entry.identity();

        let mut document = self.load_ledger()?;
        document.entries.push(entry);
        let outcome = self.compact_and_persist(document)?;

        tracing::debug!(
            identity = %identity,
            retained = outcome.retained.len(),
            archived = outcome.archived.len(),
            dropped = outcome.dropped,
            "appended entry"
        );

        Ok(AppendOutcome {
            identity,
            retained: outcome.retained.len(),
            archived: outcome.archived.len(),
            dropped: outcome.dropped,
        })
    }

    /// Run dedup and eviction over the current ledger without appending
    pub fn compact_now(&self) -> Result<AppendOutcome> {
        let _lock = self.acquire_lock()?;

        let document = self.load_ledger()?;
        let outcome = self.compact_and_persist(document)?;

        Ok(AppendOutcome {
            identity: String::new(),
            retained: outcome.retained.len(),
            archived: outcome.archived.len(),
            dropped: outcome.dropped,
        })
    }

    /// Current ledger entries, oldest first; empty when the file is absent
    pub fn entries(&self) -> Result<Vec<Entry>> {
        read_entries(&self.config.ledger_path, LEDGER_HEADER)
    }

    /// Current archive entries, oldest first; empty when the file is absent
    pub fn archive_entries(&self) -> Result<Vec<Entry>> {
        read_entries(&self.config.archive_path, ARCHIVE_HEADER)
    }

    fn acquire_lock(&self) -> Result<LedgerLock> {
        LedgerLock::acquire(&self.lock_path(), self.config.lock_timeout)
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .config
            .ledger_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger".into());
        name.push(".lock");
        self.config.ledger_path.with_file_name(name)
    }

    fn load_ledger(&self) -> Result<Document> {
        ensure_document(&self.config.ledger_path, LEDGER_HEADER)?;
        let text = fs::read_to_string(&self.config.ledger_path)?;
        Ok(Document::parse(&text, LEDGER_HEADER))
    }

    fn compact_and_persist(&self, mut document: Document) -> Result<CompactionOutcome> {
        let entries = mem::take(&mut document.entries);
        let outcome = compact(entries, self.config.max_entries, &self.config.pin_tags);
        document.entries = outcome.retained.clone();

        write_atomic(&self.config.ledger_path, &document.render())?;
        self.merge_into_archive(&outcome.archived)?;
        Ok(outcome)
    }

    /// Merge evicted pinned entries into the uncapped archive document
    ///
    /// A previously archived identity is replaced by the newer version and
    /// promoted to the recent end, through the same deduplicator the
    /// ledger uses. An empty batch is a no-op.
    fn merge_into_archive(&self, archived: &[Entry]) -> Result<()> {
        if archived.is_empty() {
            return Ok(());
        }

        ensure_document(&self.config.archive_path, ARCHIVE_HEADER)?;
        let text = fs::read_to_string(&self.config.archive_path)?;
        let mut document = Document::parse(&text, ARCHIVE_HEADER);

        document.entries.extend(archived.iter().cloned());
        document.entries = dedupe(mem::take(&mut document.entries));

        write_atomic(&self.config.archive_path, &document.render())?;
        tracing::debug!(
            archived = archived.len(),
            total = document.entries.len(),
            "merged entries into archive"
        );
        Ok(())
    }
}

fn read_entries(path: &Path, header: &str) -> Result<Vec<Entry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)?;
    Ok(Document::parse(&text, header).entries)
}

/// Create the document with its default header when absent
fn ensure_document(path: &Path, header: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    write_atomic(path, &format!("{}\n\n", header))
}

/// Write via a sibling temp file renamed into place
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path)
        .map_err(|err| crate::error::DistilError::write_failure("persist", path.display(), err))?;
    Ok(())
}

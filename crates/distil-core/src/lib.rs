//! Core domain logic for the distil realization ledger
//!
//! Distils journal text into bounded ledger entries: parsing and rendering
//! the flat document format, resolving entry identities, deduplicating,
//! enforcing the capacity bound, and archiving evicted pinned entries.

pub mod compact;
pub mod config;
pub mod document;
pub mod entry;
pub mod error;
pub mod extract;
pub mod ledger;
pub mod lock;
pub mod logging;
pub mod post;
pub mod text;

pub use compact::{compact, dedupe, CompactionOutcome};
pub use config::LedgerConfig;
pub use document::Document;
pub use entry::Entry;
pub use error::{DistilError, Result};
pub use ledger::{AppendOutcome, Ledger};

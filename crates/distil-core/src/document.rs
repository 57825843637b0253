//! Flat-document parsing and rendering
//!
//! A ledger document is a free-text prefix (usually a single `# TITLE`
//! line) followed by entry blocks. Every entry opens with a dated heading
//! marker at the start of a line; a block runs until the next marker or the
//! end of the document. Rendering is the exact inverse of parsing for any
//! document this module produced itself.

use std::sync::OnceLock;

use regex::Regex;

use crate::entry::Entry;

static MARKER_RE: OnceLock<Regex> = OnceLock::new();

fn marker_re() -> &'static Regex {
    MARKER_RE.get_or_init(|| {
        Regex::new(r"(?m)^### \[\d{4}-\d{2}-\d{2}\]\s+.+$").expect("valid regex")
    })
}

/// A parsed ledger or archive document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Header text preceding the first entry marker
    pub prefix: String,
    /// Entry blocks, oldest first
    pub entries: Vec<Entry>,
}

impl Document {
    /// Create an empty document with the given header
    pub fn empty(prefix: &str) -> Self {
        Document {
            prefix: prefix.to_string(),
            entries: Vec::new(),
        }
    }

    /// Parse document text into a prefix and ordered entry blocks
    ///
    /// A document with no recognizable markers degrades to prefix-only.
    /// An empty prefix falls back to `default_prefix`.
    pub fn parse(text: &str, default_prefix: &str) -> Self {
        let markers: Vec<_> = marker_re().find_iter(text).collect();

        let Some(first) = markers.first() else {
            let prefix = text.trim_end();
            return Document::empty(if prefix.is_empty() {
                default_prefix
            } else {
                prefix
            });
        };

        let prefix = text[..first.start()].trim_end();
        let prefix = if prefix.is_empty() {
            default_prefix
        } else {
            prefix
        };

        let mut entries = Vec::new();
        for (idx, marker) in markers.iter().enumerate() {
            let end = markers
                .get(idx + 1)
                .map(|next| next.start())
                .unwrap_or(text.len());
            let entry = Entry::new(&text[marker.start()..end]);
            if !entry.is_empty() {
                entries.push(entry);
            }
        }

        Document {
            prefix: prefix.to_string(),
            entries,
        }
    }

    /// Serialize back to flat text: prefix, then entries separated by one
    /// blank line, with a trailing newline
    pub fn render(&self) -> String {
        let blocks: Vec<&str> = self
            .entries
            .iter()
            .map(|entry| entry.as_str())
            .filter(|block| !block.trim().is_empty())
            .collect();

        if blocks.is_empty() {
            return format!("{}\n", self.prefix.trim_end());
        }
        format!("{}\n\n{}\n", self.prefix.trim_end(), blocks.join("\n\n"))
    }
}

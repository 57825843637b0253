//! Entry blocks and identity resolution
//!
//! An entry is an opaque rendered text block opened by a dated heading:
//!
//! ```text
//! ### [2026-02-19] Pause Before Replying
//! - Context: ...
//! - Source: `journal/private/2026-02-19-pause.md`
//! - Tags: `pinned`, `communication`
//! ```
//!
//! Identity is computed, not stored: the source path wins, then the dated
//! heading, then a stable content hash over the normalized text. The hash
//! fallback is deterministic across runs and its use is logged as a warning
//! because two rewordings of the same realization will no longer collapse.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::text::normalize_space;

static HEADING_RE: OnceLock<Regex> = OnceLock::new();
static SOURCE_RE: OnceLock<Regex> = OnceLock::new();
static TAGS_RE: OnceLock<Regex> = OnceLock::new();
static INLINE_TAG_RE: OnceLock<Regex> = OnceLock::new();

fn heading_re() -> &'static Regex {
    HEADING_RE.get_or_init(|| {
        Regex::new(r"(?m)^### \[(\d{4}-\d{2}-\d{2})\]\s+(.+)$").expect("valid regex")
    })
}

fn source_re() -> &'static Regex {
    SOURCE_RE.get_or_init(|| Regex::new(r"(?m)^- Source:\s+`?([^`\n]+)`?\s*$").expect("valid regex"))
}

fn tags_re() -> &'static Regex {
    TAGS_RE.get_or_init(|| Regex::new(r"(?m)^- Tags:\s+(.+?)\s*$").expect("valid regex"))
}

fn inline_tag_re() -> &'static Regex {
    INLINE_TAG_RE.get_or_init(|| Regex::new(r"`([^`]+)`").expect("valid regex"))
}

/// Number of hex characters kept from the fallback content hash
const RAW_IDENTITY_LEN: usize = 16;

/// A single rendered ledger entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry(String);

impl Entry {
    /// Wrap a rendered block, trimming surrounding whitespace
    pub fn new(text: impl Into<String>) -> Self {
        Entry(text.into().trim().to_string())
    }

    /// The rendered block text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the block trimmed to nothing
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The dated heading, when present: `(date, title)`
    pub fn heading(&self) -> Option<(&str, &str)> {
        heading_re().captures(&self.0).and_then(|caps| {
            match (caps.get(1), caps.get(2)) {
                (Some(date), Some(title)) => Some((date.as_str(), title.as_str())),
                _ => None,
            }
        })
    }

    /// The heading date, when present
    pub fn date(&self) -> Option<&str> {
        self.heading().map(|(date, _)| date)
    }

    /// The heading title, when present
    pub fn title(&self) -> Option<&str> {
        self.heading().map(|(_, title)| title)
    }

    /// The source reference from the `- Source:` line, when present
    pub fn source(&self) -> Option<String> {
        source_re()
            .captures(&self.0)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Tags from the `- Tags:` line, lower-cased and trimmed
    ///
    /// Accepts backtick-quoted tokens (`` `pinned`, `focus` ``) or a plain
    /// comma-separated list. Backtick tokens win when any are present.
    pub fn tags(&self) -> BTreeSet<String> {
        let Some(line) = tags_re()
            .captures(&self.0)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            return BTreeSet::new();
        };

        let inline: BTreeSet<String> = inline_tag_re()
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .map(|m| normalize_space(m.as_str()).to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if !inline.is_empty() {
            return inline;
        }

        line.split(',')
            .map(|t| normalize_space(t).to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// True when the entry carries any of the configured pin tags
    pub fn is_pinned(&self, pin_tags: &BTreeSet<String>) -> bool {
        !self.tags().is_disjoint(pin_tags)
    }

    /// Compute the identity key distinguishing "the same realization"
    /// across repeated distillation runs
    ///
    /// Precedence: `source:<path>`, then `title:<date>:<title>`, then a
    /// content-hash fallback `raw:<hex>`.
    pub fn identity(&self) -> String {
        if let Some(source) = self.source() {
            return format!("source:{}", source);
        }
        if let Some((date, title)) = self.heading() {
            return format!("title:{}:{}", date, normalize_space(title));
        }

        let digest = Sha256::digest(normalize_space(&self.0).as_bytes());
        let key = format!("raw:{}", &hex::encode(digest)[..RAW_IDENTITY_LEN]);
        tracing::warn!(
            identity = %key,
            first_line = self.0.lines().next().unwrap_or_default(),
            "entry has no source or dated heading; falling back to content-hash identity"
        );
        key
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

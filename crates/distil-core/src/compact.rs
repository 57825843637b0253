//! Deduplication and capacity compaction
//!
//! Dedup keeps exactly one entry per identity using a pop-and-reinsert
//! scan: a re-seen identity is removed from its old position and appended
//! at the end, so the last occurrence wins both content and position. A
//! re-append therefore refreshes recency instead of behaving as pure FIFO.
//!
//! Compaction runs dedup and then evicts from the oldest end until the
//! capacity bound holds. Evicted entries carrying a pin tag are handed back
//! for archival; the rest are discarded.

use std::collections::{BTreeSet, HashMap};

use crate::entry::Entry;

/// Result of one compaction pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactionOutcome {
    /// Entries retained in the ledger, oldest first
    pub retained: Vec<Entry>,
    /// Evicted entries that must move to the archive tier
    pub archived: Vec<Entry>,
    /// Count of evicted entries discarded permanently
    pub dropped: usize,
}

/// Collapse a sequence to one entry per identity, last occurrence winning
pub fn dedupe(entries: Vec<Entry>) -> Vec<Entry> {
    let mut order: Vec<String> = Vec::new();
    let mut by_identity: HashMap<String, Entry> = HashMap::new();

    for entry in entries {
        let key = entry.identity();
        if by_identity.contains_key(&key) {
            order.retain(|existing| existing != &key);
        }
        order.push(key.clone());
        by_identity.insert(key, entry);
    }

    order
        .into_iter()
        .filter_map(|key| by_identity.remove(&key))
        .collect()
}

/// Dedup, then enforce the capacity bound by oldest-first eviction
///
/// Pinned evictees land in `archived` preserving their relative order;
/// unpinned evictees are counted in `dropped` and gone.
pub fn compact(
    entries: Vec<Entry>,
    max_entries: usize,
    pin_tags: &BTreeSet<String>,
) -> CompactionOutcome {
    let mut retained = dedupe(entries);
    let mut archived = Vec::new();
    let mut dropped = 0;

    if retained.len() > max_entries {
        let overflow = retained.len() - max_entries;
        for candidate in retained.drain(..overflow) {
            if candidate.is_pinned(pin_tags) {
                archived.push(candidate);
            } else {
                dropped += 1;
            }
        }
    }

    CompactionOutcome {
        retained,
        archived,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_pin_tags;

    fn entry(date: &str, title: &str, source: &str, tags: &str) -> Entry {
        Entry::new(format!(
            "### [{date}] {title}\n- Context: C\n- Source: `{source}`\n- Tags: {tags}"
        ))
    }

    #[test]
    fn test_dedupe_keeps_distinct_identities_in_order() {
        let entries = vec![
            entry("2026-02-18", "A", "a.md", "`x`"),
            entry("2026-02-19", "B", "b.md", "`x`"),
        ];
        let deduped = dedupe(entries.clone());
        assert_eq!(deduped, entries);
    }

    #[test]
    fn test_dedupe_last_occurrence_wins_content_and_position() {
        let deduped = dedupe(vec![
            entry("2026-02-18", "A", "a.md", "`x`"),
            entry("2026-02-18", "B", "b.md", "`x`"),
            entry("2026-02-20", "A Updated", "a.md", "`x`"),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title(), Some("B"));
        // Re-appended identity is promoted to the recent end with new content
        assert_eq!(deduped[1].title(), Some("A Updated"));
    }

    #[test]
    fn test_dedupe_idempotent() {
        let entries = vec![
            entry("2026-02-18", "A", "a.md", "`x`"),
            entry("2026-02-19", "B", "b.md", "`x`"),
            entry("2026-02-20", "A2", "a.md", "`x`"),
        ];
        let once = dedupe(entries);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dedupe_yields_unique_identities() {
        let deduped = dedupe(vec![
            entry("2026-02-18", "A", "a.md", "`x`"),
            entry("2026-02-19", "A again", "a.md", "`x`"),
            entry("2026-02-19", "B", "b.md", "`x`"),
        ]);
        let identities: BTreeSet<String> = deduped.iter().map(Entry::identity).collect();
        assert_eq!(identities.len(), deduped.len());
    }

    #[test]
    fn test_compact_under_capacity_is_noop() {
        let entries = vec![
            entry("2026-02-18", "A", "a.md", "`x`"),
            entry("2026-02-19", "B", "b.md", "`x`"),
        ];
        let outcome = compact(entries.clone(), 10, &default_pin_tags());
        assert_eq!(outcome.retained, entries);
        assert!(outcome.archived.is_empty());
        assert_eq!(outcome.dropped, 0);
    }

    #[test]
    fn test_compact_at_capacity_is_noop() {
        let entries = vec![
            entry("2026-02-18", "A", "a.md", "`x`"),
            entry("2026-02-19", "B", "b.md", "`x`"),
        ];
        let outcome = compact(entries.clone(), 2, &default_pin_tags());
        assert_eq!(outcome.retained.len(), 2);
        assert!(outcome.archived.is_empty());
    }

    #[test]
    fn test_compact_evicts_oldest_first_to_exact_capacity() {
        let entries: Vec<Entry> = (0..5)
            .map(|i| {
                entry(
                    "2026-02-18",
                    &format!("T{i}"),
                    &format!("s{i}.md"),
                    "`x`",
                )
            })
            .collect();
        let outcome = compact(entries, 3, &default_pin_tags());
        assert_eq!(outcome.retained.len(), 3);
        assert_eq!(outcome.retained[0].title(), Some("T2"));
        assert_eq!(outcome.dropped, 2);
        assert!(outcome.archived.is_empty());
    }

    #[test]
    fn test_compact_splits_pinned_evictions_into_archive() {
        let entries = vec![
            entry("2026-02-17", "Keep1", "a.md", "`pinned`"),
            entry("2026-02-18", "Drop", "b.md", "`normal`"),
            entry("2026-02-19", "Keep2", "c.md", "`evergreen`"),
            entry("2026-02-20", "New1", "d.md", "`normal`"),
            entry("2026-02-21", "New2", "e.md", "`normal`"),
        ];
        let outcome = compact(entries, 2, &default_pin_tags());
        assert_eq!(outcome.retained.len(), 2);
        assert_eq!(outcome.retained[0].title(), Some("New1"));
        assert_eq!(outcome.retained[1].title(), Some("New2"));
        // Pinned evictees preserve relative order; the rest are discarded
        assert_eq!(outcome.archived.len(), 2);
        assert_eq!(outcome.archived[0].title(), Some("Keep1"));
        assert_eq!(outcome.archived[1].title(), Some("Keep2"));
        assert_eq!(outcome.dropped, 1);
    }

    #[test]
    fn test_compact_every_discarded_entry_is_unpinned() {
        let pins = default_pin_tags();
        let entries: Vec<Entry> = (0..6)
            .map(|i| {
                let tags = if i % 2 == 0 { "`pinned`" } else { "`other`" };
                entry("2026-02-18", &format!("T{i}"), &format!("s{i}.md"), tags)
            })
            .collect();
        let outcome = compact(entries, 2, &pins);
        for archived in &outcome.archived {
            assert!(archived.is_pinned(&pins));
        }
        // retained + archived + dropped accounts for every deduped entry
        assert_eq!(outcome.retained.len() + outcome.archived.len() + outcome.dropped, 6);
    }
}

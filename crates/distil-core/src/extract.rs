//! Deterministic field extraction from free journal text
//!
//! Extraction is heuristic but deterministic: section headings, cue
//! sentences, and keyword-mapped tags. It never interprets content beyond
//! structural markers, and every field is clipped to a character budget so
//! one rambling journal cannot flood the ledger.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DistilError, Result};
use crate::text::{limit_text, normalize_space, split_sentences, title_case};

const MAX_TITLE_CHARS: usize = 90;
const MAX_CONTEXT_CHARS: usize = 240;
const MAX_REALIZATION_CHARS: usize = 240;
const MAX_DECISION_RULE_CHARS: usize = 240;
const MAX_EVIDENCE_CHARS: usize = 240;
const MAX_SCOPE_CHARS: usize = 180;
const MAX_NEXT_ACTION_CHARS: usize = 180;

/// Sentence fragments that mark a candidate realization
const CUES: &[&str] = &[
    "learned",
    "realized",
    "pattern",
    "should",
    "next time",
    "need to",
    "if ",
    "then ",
];

/// Keyword-to-tag mapping for inferred tags
const TAG_MAPPINGS: &[(&str, &str)] = &[
    ("communicat", "communication"),
    ("emotion", "emotional-processing"),
    ("trust", "trust"),
    ("boundar", "boundaries"),
    ("conflict", "conflict"),
    ("reflect", "reflection"),
];

static SECTION_RE: OnceLock<Regex> = OnceLock::new();
static DATE_RE: OnceLock<Regex> = OnceLock::new();
static WORD_RE: OnceLock<Regex> = OnceLock::new();
static TAG_SANITIZE_RE: OnceLock<Regex> = OnceLock::new();

fn section_re() -> &'static Regex {
    SECTION_RE.get_or_init(|| Regex::new(r"^\s{0,3}##\s+(.+?)\s*$").expect("valid regex"))
}

fn date_re() -> &'static Regex {
    DATE_RE.get_or_init(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("valid regex"))
}

fn word_re() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"[A-Za-z0-9]+").expect("valid regex"))
}

fn tag_sanitize_re() -> &'static Regex {
    TAG_SANITIZE_RE.get_or_init(|| Regex::new(r"[^a-z0-9_-]").expect("valid regex"))
}

/// How firmly a realization is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl FromStr for Confidence {
    type Err = DistilError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            other => Err(DistilError::InvalidConfidence {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller-supplied overrides for extracted fields
#[derive(Debug, Clone, Default)]
pub struct FieldOverrides {
    pub title: Option<String>,
    pub confidence: Option<Confidence>,
    pub tags: Option<String>,
}

/// The fixed multi-field record rendered into one ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFields {
    pub date: String,
    pub title: String,
    pub context: String,
    pub realization: String,
    pub decision_rule: String,
    pub evidence: String,
    pub confidence: Confidence,
    pub scope: String,
    pub next_action: String,
    pub source: String,
    pub tags: Vec<String>,
}

impl EntryFields {
    /// Render the entry block appended to the ledger
    pub fn render(&self) -> String {
        let tags = self
            .tags
            .iter()
            .map(|t| format!("`{}`", t))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "### [{}] {}\n\
             - Context: {}\n\
             - Realization: {}\n\
             - Decision Rule: {}\n\
             - Evidence: {}\n\
             - Confidence: {}\n\
             - Scope: {}\n\
             - Next Action: {}\n\
             - Source: `{}`\n\
             - Tags: {}\n",
            self.date,
            self.title,
            self.context,
            self.realization,
            self.decision_rule,
            self.evidence,
            self.confidence,
            self.scope,
            self.next_action,
            self.source,
            tags
        )
    }
}

/// Extract entry fields from a journal body
///
/// `file_name` feeds the date and title fallbacks; `source` is the
/// reference recorded on the entry (typically workspace-relative).
pub fn extract_fields(
    file_name: &str,
    source: &str,
    body: &str,
    overrides: &FieldOverrides,
) -> EntryFields {
    let sections = extract_sections(body);
    let cues = cue_sentences(body);
    let cue = cues.first().cloned().unwrap_or_default();

    let context = section_line(&sections, "what happened")
        .or_else(|| section_line(&sections, "context"))
        .or_else(|| first_nonempty_paragraph(body))
        .unwrap_or_else(|| "Journal processing context.".to_string());

    let realization = section_line(&sections, "realizations")
        .or_else(|| section_line(&sections, "deeper analysis"))
        .or_else(|| non_empty(cue.clone()))
        .unwrap_or_else(|| "A stable realization was identified from this journal.".to_string());

    let evidence = section_line(&sections, "deeper analysis")
        .or_else(|| section_line(&sections, "initial reaction"))
        .or_else(|| non_empty(cue.clone()))
        .unwrap_or_else(|| "Source journal reviewed for repeat patterns.".to_string());

    let title = overrides
        .title
        .as_deref()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| infer_title(file_name, &realization));

    let tags = overrides
        .tags
        .as_deref()
        .and_then(|raw| non_empty_vec(parse_tag_list(raw)))
        .unwrap_or_else(|| infer_tags(body));

    EntryFields {
        date: date_from_name(file_name).unwrap_or_else(today),
        title: limit_text(&title, MAX_TITLE_CHARS),
        context: limit_text(&context, MAX_CONTEXT_CHARS),
        realization: limit_text(&realization, MAX_REALIZATION_CHARS),
        decision_rule: limit_text(&as_decision_rule(&realization, &cue), MAX_DECISION_RULE_CHARS),
        evidence: limit_text(&evidence, MAX_EVIDENCE_CHARS),
        confidence: overrides.confidence.unwrap_or_default(),
        scope: limit_text(
            "Applies to similar situations; re-check when context changes.",
            MAX_SCOPE_CHARS,
        ),
        next_action: limit_text(
            "Apply this rule in the next relevant interaction and review the outcome.",
            MAX_NEXT_ACTION_CHARS,
        ),
        source: source.to_string(),
        tags,
    }
}

/// Split a body into `## Heading` sections, keyed by lower-cased heading
fn extract_sections(body: &str) -> HashMap<String, Vec<String>> {
    let mut sections: HashMap<String, Vec<String>> = HashMap::new();
    let mut current: Option<String> = None;
    for line in body.lines() {
        if let Some(caps) = section_re().captures(line) {
            if let Some(heading) = caps.get(1) {
                let key = heading.as_str().trim().to_lowercase();
                sections.entry(key.clone()).or_default();
                current = Some(key);
                continue;
            }
        }
        if let Some(key) = &current {
            sections
                .entry(key.clone())
                .or_default()
                .push(line.to_string());
        }
    }
    sections
}

fn section_line(sections: &HashMap<String, Vec<String>>, key: &str) -> Option<String> {
    sections.get(key).and_then(|lines| {
        lines
            .iter()
            .map(|line| normalize_space(line))
            .find(|line| !line.is_empty())
    })
}

/// The first run of non-empty, non-heading lines, joined and normalized
fn first_nonempty_paragraph(body: &str) -> Option<String> {
    let mut lines: Vec<&str> = Vec::new();
    for raw in body.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            if !lines.is_empty() {
                break;
            }
            continue;
        }
        lines.push(line);
    }
    non_empty(normalize_space(&lines.join(" ")))
}

/// Sentences containing a cue word, falling back to all sentences
fn cue_sentences(body: &str) -> Vec<String> {
    let sentences = split_sentences(body);
    let ranked: Vec<String> = sentences
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            CUES.iter().any(|cue| lower.contains(cue))
        })
        .cloned()
        .collect();
    if ranked.is_empty() {
        sentences
    } else {
        ranked
    }
}

/// Title from the first six words of the cue, else from the file stem
fn infer_title(file_name: &str, cue: &str) -> String {
    if !cue.is_empty() {
        let words: Vec<&str> = word_re()
            .find_iter(cue)
            .take(6)
            .map(|m| m.as_str())
            .collect();
        if !words.is_empty() {
            return title_case(&words.join(" "));
        }
    }

    let stem = file_name
        .rsplit('/')
        .next()
        .unwrap_or(file_name)
        .split('.')
        .next()
        .unwrap_or_default();
    let stem: String = stem.chars().take(60).collect();
    non_empty(title_case(&stem)).unwrap_or_else(|| "Journal Distillation".to_string())
}

/// Always seeds `journal, distilled`, then keyword-mapped tags
fn infer_tags(text: &str) -> Vec<String> {
    let mut tags = vec!["journal".to_string(), "distilled".to_string()];
    let lower = text.to_lowercase();
    for (needle, tag) in TAG_MAPPINGS {
        if lower.contains(needle) && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Pass through an `If ... then ...` sentence, else wrap in the rule template
fn as_decision_rule(realization: &str, cue: &str) -> String {
    let candidate = if realization.is_empty() { cue } else { realization };
    let lower = candidate.to_lowercase();
    if lower.contains("if ") && lower.contains(" then ") {
        return candidate.to_string();
    }
    if !candidate.is_empty() {
        return format!("If this pattern appears again, apply this rule: {}", candidate);
    }
    "If a similar pattern appears, pause, reflect, and choose a response aligned with this realization.".to_string()
}

/// Sanitize a comma-separated tag list to `[a-z0-9_-]` tokens
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| {
            tag_sanitize_re()
                .replace_all(&t.trim().to_lowercase(), "")
                .to_string()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// A `YYYY-MM-DD` date embedded in the file name, when present
fn date_from_name(file_name: &str) -> Option<String> {
    date_re()
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_empty_vec(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;

    const BODY: &str = "\
# Morning pages

Free-floating worry about the review meeting.

## What Happened
Review ran long and I got defensive early.

## Initial Reaction
Wanted to defend every choice immediately.

## Deeper Analysis
The defensiveness pattern shows up whenever feedback is public.

## Realizations
I realized pausing before replying changes the whole outcome.
Worth more reflection after the next public feedback round.
";

    #[test]
    fn test_extract_uses_sections() {
        let fields = extract_fields(
            "2026-02-19-review.md",
            "journal/private/2026-02-19-review.md",
            BODY,
            &FieldOverrides::default(),
        );
        assert_eq!(fields.date, "2026-02-19");
        assert_eq!(fields.context, "Review ran long and I got defensive early.");
        assert_eq!(
            fields.realization,
            "I realized pausing before replying changes the whole outcome."
        );
        assert_eq!(
            fields.evidence,
            "The defensiveness pattern shows up whenever feedback is public."
        );
        assert_eq!(fields.confidence, Confidence::Medium);
    }

    #[test]
    fn test_extract_falls_back_to_first_paragraph_and_cues() {
        let body = "Just prose today. I learned to stop overpromising.";
        let fields = extract_fields("notes.md", "notes.md", body, &FieldOverrides::default());
        assert_eq!(
            fields.context,
            "Just prose today. I learned to stop overpromising."
        );
        assert_eq!(fields.realization, "I learned to stop overpromising.");
    }

    #[test]
    fn test_extract_empty_body_uses_defaults() {
        let fields = extract_fields("empty.md", "empty.md", "", &FieldOverrides::default());
        assert_eq!(fields.context, "Journal processing context.");
        assert_eq!(
            fields.realization,
            "A stable realization was identified from this journal."
        );
        assert!(fields
            .decision_rule
            .starts_with("If this pattern appears again"));
    }

    #[test]
    fn test_title_from_realization_words() {
        let fields = extract_fields(
            "2026-02-19-review.md",
            "journal/private/2026-02-19-review.md",
            BODY,
            &FieldOverrides::default(),
        );
        assert_eq!(fields.title, "I Realized Pausing Before Replying Changes");
    }

    #[test]
    fn test_title_override_wins() {
        let overrides = FieldOverrides {
            title: Some("  Chosen Title ".to_string()),
            ..Default::default()
        };
        let fields = extract_fields("x.md", "x.md", BODY, &overrides);
        assert_eq!(fields.title, "Chosen Title");
    }

    #[test]
    fn test_decision_rule_passes_through_if_then() {
        let body = "## Realizations\nIf feedback lands publicly then I wait a beat.\n";
        let fields = extract_fields("x.md", "x.md", body, &FieldOverrides::default());
        assert_eq!(
            fields.decision_rule,
            "If feedback lands publicly then I wait a beat."
        );
    }

    #[test]
    fn test_field_caps_limit_long_values() {
        let long = "verylong ".repeat(120);
        let body = format!("## What Happened\n{long}\n\n## Realizations\n{long}\n");
        let fields = extract_fields("x.md", "x.md", &body, &FieldOverrides::default());
        assert!(fields.context.chars().count() <= MAX_CONTEXT_CHARS);
        assert!(fields.realization.chars().count() <= MAX_REALIZATION_CHARS);
        assert!(fields.decision_rule.chars().count() <= MAX_DECISION_RULE_CHARS);
        assert!(fields.context.ends_with("..."));
    }

    #[test]
    fn test_infer_tags_keyword_mapping() {
        let fields = extract_fields("x.md", "x.md", BODY, &FieldOverrides::default());
        assert_eq!(fields.tags[0], "journal");
        assert_eq!(fields.tags[1], "distilled");
        assert!(fields.tags.contains(&"reflection".to_string()));
    }

    #[test]
    fn test_tags_override_sanitized() {
        let overrides = FieldOverrides {
            tags: Some("Deep Work!, focus , ".to_string()),
            ..Default::default()
        };
        let fields = extract_fields("x.md", "x.md", BODY, &overrides);
        assert_eq!(fields.tags, vec!["deepwork", "focus"]);
    }

    #[test]
    fn test_confidence_parsing() {
        assert_eq!("HIGH".parse::<Confidence>().expect("parse"), Confidence::High);
        assert!(matches!(
            "wild".parse::<Confidence>(),
            Err(DistilError::InvalidConfidence { .. })
        ));
    }

    #[test]
    fn test_render_produces_parseable_entry() {
        let fields = extract_fields(
            "2026-02-19-review.md",
            "journal/private/2026-02-19-review.md",
            BODY,
            &FieldOverrides::default(),
        );
        let entry = Entry::new(fields.render());
        assert_eq!(entry.date(), Some("2026-02-19"));
        assert_eq!(
            entry.identity(),
            "source:journal/private/2026-02-19-review.md"
        );
        assert!(entry.tags().contains("journal"));
    }

    #[test]
    fn test_date_falls_back_to_today_when_name_has_none() {
        let fields = extract_fields("undated.md", "undated.md", "", &FieldOverrides::default());
        assert_eq!(fields.date.len(), 10);
        assert!(date_from_name(&fields.date).is_some());
    }
}

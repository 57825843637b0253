//! Text normalization helpers shared by extraction and identity resolution

use regex::Regex;
use std::sync::OnceLock;

static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
static MARKDOWN_NOISE_RE: OnceLock<Regex> = OnceLock::new();
static WORD_SPLIT_RE: OnceLock<Regex> = OnceLock::new();

fn whitespace_re() -> &'static Regex {
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn markdown_noise_re() -> &'static Regex {
    MARKDOWN_NOISE_RE.get_or_init(|| Regex::new(r"[`*_>#-]").expect("valid regex"))
}

fn word_split_re() -> &'static Regex {
    WORD_SPLIT_RE.get_or_init(|| Regex::new(r"[\s_-]+").expect("valid regex"))
}

/// Collapse all whitespace runs to single spaces and trim
pub fn normalize_space(text: &str) -> String {
    whitespace_re().replace_all(text, " ").trim().to_string()
}

/// Normalize then clip to a character budget, appending an ellipsis when clipped
pub fn limit_text(text: &str, max_chars: usize) -> String {
    let normalized = normalize_space(text);
    if normalized.chars().count() <= max_chars {
        return normalized;
    }
    let clipped: String = normalized
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect();
    format!("{}...", clipped.trim_end())
}

/// Capitalize each word, splitting on whitespace, underscores, and hyphens
pub fn title_case(text: &str) -> String {
    word_split_re()
        .split(text.trim())
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Split prose into sentences, stripping markdown punctuation first
///
/// A sentence ends at `.`, `!`, or `?` followed by whitespace or end of text.
pub fn split_sentences(text: &str) -> Vec<String> {
    let plain = markdown_noise_re().replace_all(text, " ");
    let plain = normalize_space(&plain);
    if plain.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = plain.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        let terminal = matches!(c, '.' | '!' | '?');
        if terminal && chars.peek().map_or(true, |n| n.is_whitespace()) {
            let sentence = current.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }
    let tail = current.trim().to_string();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

//! Journal post scaffolding
//!
//! Creates dated journal files from embedded templates so distillation has
//! a predictable section layout to extract from.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{DistilError, Result};

/// Directory under the workspace holding journal posts
pub const JOURNAL_DIR: &str = "journal";

const PRIVATE_TEMPLATE: &str = "\
# {{title}}

Date: {{date}}

## What Happened

## Initial Reaction

## Deeper Analysis

## Realizations
";

const PUBLIC_TEMPLATE: &str = "\
# {{title}}

Date: {{date}}

## Context

## Realizations
";

/// Whether a post is private (distillation source) or public
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public => "public",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            Visibility::Private => PRIVATE_TEMPLATE,
            Visibility::Public => PUBLIC_TEMPLATE,
        }
    }
}

impl FromStr for Visibility {
    type Err = DistilError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "private" => Ok(Visibility::Private),
            "public" => Ok(Visibility::Public),
            other => Err(DistilError::UsageError(format!(
                "unknown visibility: {} (expected: private or public)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Create `<workspace>/journal/<visibility>/<date>-<slug>.md` from the
/// matching template, refusing to overwrite an existing post
pub fn create_post(
    workspace: &Path,
    visibility: Visibility,
    title: &str,
    date_override: Option<&str>,
) -> Result<PathBuf> {
    let date = resolve_date(date_override)?;
    let path = post_path(workspace, visibility, title, date);
    if path.exists() {
        return Err(DistilError::PostExists { path });
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, render_template(visibility.template(), date, title))?;
    tracing::debug!(path = %path.display(), %visibility, "created post");
    Ok(path)
}

/// The path a post for this title and date would land at
pub fn post_path(
    workspace: &Path,
    visibility: Visibility,
    title: &str,
    date: NaiveDate,
) -> PathBuf {
    let slug = slug::slugify(title);
    let slug = if slug.is_empty() {
        "entry".to_string()
    } else {
        slug
    };
    workspace
        .join(JOURNAL_DIR)
        .join(visibility.as_str())
        .join(format!("{}-{}.md", date, slug))
}

fn resolve_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        None => Ok(chrono::Local::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            DistilError::InvalidDate {
                value: raw.to_string(),
            }
        }),
    }
}

fn render_template(template: &str, date: NaiveDate, title: &str) -> String {
    template
        .replace("{{date}}", &date.to_string())
        .replace("{{title}}", title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_private_post() {
        let dir = tempdir().expect("tempdir");
        let path = create_post(
            dir.path(),
            Visibility::Private,
            "Pause Before Replying",
            Some("2026-02-19"),
        )
        .expect("create");

        assert_eq!(
            path,
            dir.path()
                .join("journal/private/2026-02-19-pause-before-replying.md")
        );
        let text = fs::read_to_string(&path).expect("read");
        assert!(text.starts_with("# Pause Before Replying\n"));
        assert!(text.contains("Date: 2026-02-19"));
        assert!(text.contains("## Realizations"));
    }

    #[test]
    fn test_create_refuses_overwrite() {
        let dir = tempdir().expect("tempdir");
        create_post(dir.path(), Visibility::Private, "Same", Some("2026-02-19"))
            .expect("create");
        let err = create_post(dir.path(), Visibility::Private, "Same", Some("2026-02-19"))
            .unwrap_err();
        assert!(matches!(err, DistilError::PostExists { .. }));
    }

    #[test]
    fn test_invalid_date_is_usage_error() {
        let dir = tempdir().expect("tempdir");
        let err = create_post(dir.path(), Visibility::Public, "T", Some("19-02-2026")).unwrap_err();
        assert!(matches!(err, DistilError::InvalidDate { .. }));
    }

    #[test]
    fn test_empty_title_slug_falls_back() {
        let dir = tempdir().expect("tempdir");
        let path = create_post(dir.path(), Visibility::Public, "!!!", Some("2026-02-19"))
            .expect("create");
        assert!(path.ends_with("journal/public/2026-02-19-entry.md"));
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!(
            "Private".parse::<Visibility>().expect("parse"),
            Visibility::Private
        );
        assert!("secret".parse::<Visibility>().is_err());
    }
}

// Comment domain models - pure data types plus the display helpers the
// presentation layer needs (paragraph splitting, initials, relative age,
// page-key derivation). Nothing here touches storage or transport.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// An approved comment as read back from the store.
///
/// `id` and `created_at` are assigned by the store; the moderation status
/// never reaches the client, which only ever queries approved rows. The
/// author's email is write-only and deliberately absent here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub page_key: String,
    /// Absent for top-level comments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the store. Optional fields are omitted from the
/// serialized body entirely, never sent as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub page_key: String,
    pub author_name: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
}

impl Comment {
    /// Split the body on blank-line boundaries for display.
    ///
    /// The body is plain text; no markup is interpreted. Runs of two or more
    /// newlines separate paragraphs, and empty paragraphs are dropped.
    pub fn paragraphs(&self) -> Vec<&str> {
        static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
        let splitter = BLANK_LINES.get_or_init(|| Regex::new(r"\n{2,}").expect("valid pattern"));

        splitter
            .split(&self.body)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Age label relative to `now`: "just now", "N minutes ago", and so on,
    /// falling back to a plain date after 30 days.
    pub fn relative_age(&self, now: DateTime<Utc>) -> String {
        let elapsed = now - self.created_at;

        let minutes = elapsed.num_minutes();
        let hours = elapsed.num_hours();
        let days = elapsed.num_days();

        if elapsed.num_seconds() < 60 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{} minute{} ago", minutes, if minutes == 1 { "" } else { "s" })
        } else if hours < 24 {
            format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
        } else if days < 30 {
            format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
        } else {
            self.created_at.format("%b %-d, %Y").to_string()
        }
    }
}

/// Avatar initials for a display name: first character of a single name,
/// first and last initials otherwise, "?" when blank.
pub fn initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => "?".to_string(),
        [single] => single.chars().take(1).collect(),
        [first, .., last] => first
            .chars()
            .take(1)
            .chain(last.chars().take(1))
            .collect(),
    }
}

/// Derive a page key from a page path when the hosting page does not supply
/// one explicitly: `/blog/<slug>.html` maps to `<slug>`, anything else to
/// the path with slashes turned into dashes.
pub fn derive_page_key(path: &str) -> String {
    static BLOG_SLUG: OnceLock<Regex> = OnceLock::new();
    let pattern = BLOG_SLUG.get_or_init(|| Regex::new(r"/blog/(.+?)\.html").expect("valid pattern"));

    if let Some(captures) = pattern.captures(path) {
        return captures[1].to_string();
    }
    path.replace('/', "-").trim_matches('-').to_string()
}

//! Defensive decoding for rows imported from the previous portal.
//!
//! The old system stored post media and engagement data as JSON blobs in
//! text columns, and some rows predate the dedicated creation-time column.
//! These helpers normalise whatever survives in those columns into the
//! shapes the rest of the crate works with. Newly created rows never take
//! the fallback paths.

use chrono::NaiveDateTime;
use serde_json::Value;

/// A comment recovered from a legacy engagement blob.
///
/// Legacy blobs carry duplicate keys (`content`/`text`, `timestamp`/
/// `created_at`) and ids that may be numbers or strings, so fields are
/// extracted manually rather than derived.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyComment {
    pub id: Value,
    pub author: String,
    pub content: String,
    pub created_at: Option<String>,
}

/// Decoded state of a legacy `comments` column.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyComments {
    /// The column held a JSON array of comment objects.
    List(Vec<LegacyComment>),
    /// The column held a bare integer: a count with no comment bodies.
    CountOnly(i64),
    /// Absent, empty, or undecodable.
    Empty,
}

impl LegacyComments {
    /// Number of comments this blob accounts for.
    #[must_use]
    pub fn count(&self) -> i64 {
        match self {
            Self::List(comments) => comments.len() as i64,
            Self::CountOnly(n) => *n,
            Self::Empty => 0,
        }
    }

    /// The recovered comment bodies, if any.
    #[must_use]
    pub fn into_list(self) -> Vec<LegacyComment> {
        match self {
            Self::List(comments) => comments,
            Self::CountOnly(_) | Self::Empty => Vec::new(),
        }
    }
}

/// Decode a stored `images` column into an ordered list of references.
///
/// Undecodable text is treated as a single bare reference. Entries that
/// themselves parse as JSON arrays are unwrapped to their first element,
/// correcting rows that were serialised twice by the old system.
#[must_use]
pub fn decode_images(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries.iter().filter_map(image_entry).collect(),
        Ok(Value::Null) => Vec::new(),
        Ok(Value::String(single)) => vec![unwrap_double_encoded(&single)],
        Ok(other) => vec![other.to_string()],
        Err(_) => vec![raw.to_owned()],
    }
}

fn image_entry(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(unwrap_double_encoded(s)),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Unwrap an image entry that is itself a serialised JSON array.
fn unwrap_double_encoded(entry: &str) -> String {
    if let Ok(Value::Array(inner)) = serde_json::from_str::<Value>(entry) {
        if let Some(first) = inner.first() {
            return match first {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
        }
        return String::new();
    }
    entry.to_owned()
}

/// Decode a legacy `comments` column.
///
/// A JSON array yields the recovered comment list; bare numeric text is a
/// count-only marker; anything else (including `"[]"` and empty text) is
/// treated as no comments.
#[must_use]
pub fn decode_legacy_comments(raw: Option<&str>) -> LegacyComments {
    let Some(raw) = raw else {
        return LegacyComments::Empty;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return LegacyComments::Empty;
    }
    if let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(trimmed) {
        let comments: Vec<LegacyComment> = entries.iter().filter_map(comment_from_value).collect();
        if comments.is_empty() {
            return LegacyComments::Empty;
        }
        return LegacyComments::List(comments);
    }
    if let Ok(count) = trimmed.parse::<i64>() {
        return LegacyComments::CountOnly(count.max(0));
    }
    LegacyComments::Empty
}

fn comment_from_value(value: &Value) -> Option<LegacyComment> {
    let obj = value.as_object()?;
    let content = obj
        .get("content")
        .or_else(|| obj.get("text"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    let author = obj
        .get("author")
        .and_then(Value::as_str)
        .unwrap_or("User")
        .to_owned();
    let created_at = obj
        .get("created_at")
        .or_else(|| obj.get("timestamp"))
        .and_then(Value::as_str)
        .map(str::to_owned);
    let id = obj.get("id").cloned().unwrap_or(Value::Null);
    Some(LegacyComment {
        id,
        author,
        content,
        created_at,
    })
}

/// Resolve a post's effective creation instant.
///
/// Prefers the dedicated column, then the legacy timestamp column, then
/// the current instant. The final fallback can misreport ordering for
/// very old rows lacking both values; no migration backfills one from
/// the other.
#[must_use]
pub fn effective_created_at(
    created_at: Option<NaiveDateTime>,
    legacy_timestamp: Option<NaiveDateTime>,
) -> NaiveDateTime {
    created_at
        .or(legacy_timestamp)
        .unwrap_or_else(|| chrono::Utc::now().naive_utc())
}

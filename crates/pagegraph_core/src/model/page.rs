//! Page domain model.
//!
//! # Responsibility
//! - Define the raw export shape (`RawExport`, `RawPage`, `RawLine`).
//! - Define the canonical normalized `Page` and its derived metadata.
//!
//! # Invariants
//! - `tags` and `links` contain no duplicates and keep first-seen order.
//! - `backlinks` stays empty until the indexer has seen the whole batch.
//! - `metadata.link_count == links.len()`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Heuristic single-label content category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreativeType {
    Poetry,
    Essay,
    Criticism,
    /// Fallback when no keyword matches.
    Note,
    Diary,
}

impl CreativeType {
    pub const ALL: [CreativeType; 5] = [
        CreativeType::Poetry,
        CreativeType::Essay,
        CreativeType::Criticism,
        CreativeType::Note,
        CreativeType::Diary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Poetry => "poetry",
            Self::Essay => "essay",
            Self::Criticism => "criticism",
            Self::Note => "note",
            Self::Diary => "diary",
        }
    }

    /// Parses a wire name case-insensitively. Returns `None` for unknown names.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }
}

impl Display for CreativeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived per-page metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Character count of all lines joined by `\n`. Named after the export
    /// tooling field; this is not a token count. Counts Unicode scalar
    /// values, so a character outside the Basic Multilingual Plane (most
    /// emoji) counts once, where a UTF-16 length would count it twice.
    pub word_count: usize,
    pub link_count: usize,
    pub creative_type: CreativeType,
}

/// Canonical normalized page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    /// Raw text lines, the source of truth for content.
    pub lines: Vec<String>,
    /// Unix epoch seconds.
    pub created: i64,
    /// Unix epoch seconds.
    pub updated: i64,
    pub tags: Vec<String>,
    /// Titles referenced by this page.
    pub links: Vec<String>,
    /// Titles of pages whose `links` contain this page's title.
    pub backlinks: Vec<String>,
    pub metadata: PageMetadata,
}

impl Page {
    /// Returns the page body joined by `\n`.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|own| own == tag)
    }

    /// Returns whether the page carries at least one of `tags`.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.has_tag(tag))
    }
}

/// One line of a raw export page.
///
/// Exports come in two flavours: plain string lines, and line objects with
/// a `text` field plus authoring metadata. Anything else is unreadable and
/// dropped during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLine {
    Text(String),
    Block { text: String },
    Unreadable(Value),
}

impl RawLine {
    /// Returns the line text, or `None` for unreadable entries.
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) | Self::Block { text } => Some(text),
            Self::Unreadable(_) => None,
        }
    }
}

impl From<Value> for RawLine {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Object(fields) => {
                let text = fields.get("text").and_then(Value::as_str).map(str::to_string);
                match text {
                    Some(text) => Self::Block { text },
                    None => Self::Unreadable(Value::Object(fields)),
                }
            }
            other => Self::Unreadable(other),
        }
    }
}

impl From<&str> for RawLine {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawLine {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Page record as delivered by a page source, before normalization.
///
/// Every field is optional on the wire and a field of the wrong type reads
/// as absent, so one malformed record never fails a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawPage {
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_lines")]
    pub lines: Option<Vec<RawLine>>,
    /// Integer seconds only; fractional or textual values read as absent.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<i64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated: Option<i64>,
}

impl RawPage {
    /// Builds a raw page with string lines and no id or timestamps.
    pub fn new<I, S>(title: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            title: title.into(),
            lines: Some(
                lines
                    .into_iter()
                    .map(|line| RawLine::Text(line.into()))
                    .collect(),
            ),
            created: None,
            updated: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_timestamps(mut self, created: i64, updated: i64) -> Self {
        self.created = Some(created);
        self.updated = Some(updated);
        self
    }
}

/// One export batch: a whole project export or one split part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExport {
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub display_name: Option<String>,
    /// Must be an array. Entries that are not page objects become empty
    /// pages instead of failing the batch.
    #[serde(deserialize_with = "lenient_pages")]
    pub pages: Vec<RawPage>,
}

impl RawExport {
    pub fn from_pages(pages: Vec<RawPage>) -> Self {
        Self {
            name: None,
            display_name: None,
            pages,
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_optional_string(deserializer)?.unwrap_or_default())
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

fn lenient_lines<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<RawLine>>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(items.into_iter().map(RawLine::from).collect())),
        _ => Ok(None),
    }
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_i64())
}

fn lenient_pages<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RawPage>, D::Error> {
    let entries = Vec::<Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| RawPage::deserialize(entry).unwrap_or_default())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{CreativeType, RawExport, RawLine};

    #[test]
    fn creative_type_parse_is_case_insensitive() {
        assert_eq!(CreativeType::parse(" Poetry "), Some(CreativeType::Poetry));
        assert_eq!(CreativeType::parse("DIARY"), Some(CreativeType::Diary));
        assert_eq!(CreativeType::parse("novel"), None);
    }

    #[test]
    fn raw_export_accepts_string_and_object_lines() {
        let json = r##"{
            "name": "demo",
            "displayName": "Demo",
            "exported": 1700000000,
            "pages": [
                {"id": "p1", "title": "One", "created": 1, "updated": 2,
                 "lines": ["One", {"text": "#tag body", "userId": "u1"}, 42]}
            ]
        }"##;

        let export: RawExport = serde_json::from_str(json).expect("export should parse");
        assert_eq!(export.display_name.as_deref(), Some("Demo"));
        let lines = export.pages[0].lines.clone().expect("lines present");
        assert_eq!(lines[0], RawLine::Text("One".to_string()));
        assert_eq!(lines[1].clone().into_text().as_deref(), Some("#tag body"));
        assert_eq!(lines[2].clone().into_text(), None);
    }

    #[test]
    fn raw_page_tolerates_missing_and_null_fields() {
        let json = r#"{"pages": [{"title": "Bare"}, {"title": "Nulls", "lines": null, "id": null}]}"#;
        let export: RawExport = serde_json::from_str(json).expect("export should parse");
        assert_eq!(export.pages.len(), 2);
        assert!(export.pages[0].lines.is_none());
        assert!(export.pages[1].lines.is_none());
        assert!(export.pages[1].id.is_none());
    }

    #[test]
    fn wrongly_typed_fields_read_as_absent() {
        let json = r#"{"pages": [
            {"title": "Good", "lines": ["kept"], "created": 5, "updated": 6},
            {"title": null, "id": 7, "lines": "oops", "created": "2024", "updated": 1700000000.5},
            {"title": "Odd lines", "lines": [{"text": 3}, "ok"]},
            17
        ]}"#;

        let export: RawExport = serde_json::from_str(json).expect("bad pages must not fail the batch");
        assert_eq!(export.pages.len(), 4);
        assert_eq!(export.pages[0].title, "Good");
        assert_eq!(export.pages[0].created, Some(5));

        let bad = &export.pages[1];
        assert_eq!(bad.title, "");
        assert!(bad.id.is_none());
        assert!(bad.lines.is_none());
        assert_eq!((bad.created, bad.updated), (None, None));

        let odd = export.pages[2].lines.clone().expect("lines present");
        assert_eq!(odd[0].clone().into_text(), None);
        assert_eq!(odd[1], RawLine::Text("ok".to_string()));

        assert_eq!(export.pages[3], super::RawPage::default());
    }

    #[test]
    fn pages_must_still_be_an_array() {
        assert!(serde_json::from_str::<RawExport>(r#"{"pages": "none"}"#).is_err());
        assert!(serde_json::from_str::<RawExport>(r#"{"name": "x"}"#).is_err());
    }
}

//! Read-only catalog projections of project snapshots.
//!
//! # Responsibility
//! - Summarize projects, pages and tags for listing callers.
//!
//! # Invariants
//! - Projections copy data out of the snapshot; they never borrow it.

use crate::model::page::{CreativeType, Page};
use crate::model::project::Project;
use chrono::{DateTime, SecondsFormat};
use serde::Serialize;

/// Titles listed per tag summary.
pub const TAG_SUMMARY_PAGE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub last_updated: i64,
    pub page_count: usize,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            display_name: project.display_name.clone(),
            description: project.description.clone(),
            last_updated: project.last_updated,
            page_count: project.page_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub title: String,
    /// ISO-8601 UTC, millisecond precision.
    pub created: String,
    pub updated: String,
    pub tags: Vec<String>,
    pub word_count: usize,
    pub creative_type: CreativeType,
}

impl From<&Page> for PageSummary {
    fn from(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            created: iso_timestamp(page.created),
            updated: iso_timestamp(page.updated),
            tags: page.tags.clone(),
            word_count: page.metadata.word_count,
            creative_type: page.metadata.creative_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSummary {
    pub tag: String,
    pub page_count: usize,
    /// First `TAG_SUMMARY_PAGE_LIMIT` titles in page order.
    pub pages: Vec<String>,
}

pub fn page_summaries(project: &Project) -> Vec<PageSummary> {
    project.pages.iter().map(PageSummary::from).collect()
}

pub fn tag_summaries(project: &Project) -> Vec<TagSummary> {
    project
        .tag_index
        .iter()
        .map(|(tag, titles)| TagSummary {
            tag: tag.clone(),
            page_count: titles.len(),
            pages: titles.iter().take(TAG_SUMMARY_PAGE_LIMIT).cloned().collect(),
        })
        .collect()
}

/// Formats Unix seconds as `YYYY-MM-DDTHH:MM:SS.sssZ`; out-of-range values
/// format as an empty string.
pub fn iso_timestamp(seconds: i64) -> String {
    DateTime::from_timestamp(seconds, 0)
        .map(|datetime| datetime.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

//! Project snapshot model.
//!
//! # Responsibility
//! - Hold one project's pages together with the derived tag index and
//!   link graph.
//!
//! # Invariants
//! - `pages` keeps ingestion order; it is never re-sorted.
//! - `tag_index` and `link_graph` are derived from `pages` at build time and
//!   are never updated in place. Rebuilding produces a new snapshot.

use crate::model::page::Page;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Immutable, fully indexed snapshot of one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Distinguishes this snapshot from the one it replaced.
    pub snapshot_id: Uuid,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub pages: Vec<Page>,
    /// Tag -> titles carrying it, in page order.
    pub tag_index: BTreeMap<String, Vec<String>>,
    /// Title -> outgoing links followed by backlinks. Duplicates allowed.
    pub link_graph: BTreeMap<String, Vec<String>>,
    /// Unix epoch milliseconds of snapshot construction.
    pub last_updated: i64,
}

impl Project {
    /// Returns the first page with exactly this title.
    pub fn page(&self, title: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.title == title)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Returns titles carrying `tag`, or an empty slice for unknown tags.
    pub fn titles_with_tag(&self, tag: &str) -> &[String] {
        self.tag_index.get(tag).map_or(&[], Vec::as_slice)
    }

    /// Returns the denormalized neighbor list for `title`.
    pub fn neighbors(&self, title: &str) -> &[String] {
        self.link_graph.get(title).map_or(&[], Vec::as_slice)
    }
}

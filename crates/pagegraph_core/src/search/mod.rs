//! Keyword search over project snapshots.
//!
//! # Responsibility
//! - Apply tag and creative-type filters, score candidates and rank them.
//! - Shape hits into the search response envelope.
//!
//! # Invariants
//! - Pages scoring `0` are never returned.
//! - Ranking is descending by score; ties keep input order (stable sort).
//! - `total_results` counts matches before the limit is applied.

pub mod relevance;

use crate::model::page::CreativeType;
use crate::model::project::Project;
use log::debug;
use relevance::{matched_context, RelevanceScorer, TermMatcher};
use serde::Serialize;
use std::cmp::Ordering;
use std::time::Instant;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;
/// Context lines reported per hit.
pub const CONTEXT_LINES_PER_HIT: usize = 3;

/// Search options. Filters are AND-combined; `None` means no filter and an
/// empty list matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    /// Project names to search; `None` means every registered project.
    pub projects: Option<Vec<String>>,
    /// Keep pages carrying at least one of these tags.
    pub tags: Option<Vec<String>>,
    pub creative_type: Option<CreativeType>,
    /// Defaults to `DEFAULT_SEARCH_LIMIT`.
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn applied_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)
    }

    /// Returns the project filter, if any.
    pub fn project_filter(&self) -> Option<&[String]> {
        self.projects.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub project: String,
    pub title: String,
    pub relevance_score: f64,
    pub tags: Vec<String>,
    pub creative_type: CreativeType,
    pub context: Vec<String>,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchHit>,
}

/// Searches `projects` in the given order.
///
/// The project filter of `query` is the caller's job; this function only
/// applies page-level filters. Blank or whitespace-only text matches
/// nothing, rather than every page through an empty title substring.
pub fn search_pages<'a, M, I>(projects: I, query: &SearchQuery, scorer: &RelevanceScorer<M>) -> SearchResults
where
    M: TermMatcher,
    I: IntoIterator<Item = &'a Project>,
{
    let started_at = Instant::now();
    let mut hits = Vec::new();

    if !query.text.trim().is_empty() {
        let tag_filter = query.tags.as_deref();
        for project in projects {
            for page in &project.pages {
                if let Some(tags) = tag_filter {
                    if !page.has_any_tag(tags) {
                        continue;
                    }
                }
                if let Some(kind) = query.creative_type {
                    if page.metadata.creative_type != kind {
                        continue;
                    }
                }

                let score = scorer.score(page, &query.text);
                if score <= 0.0 {
                    continue;
                }

                let mut context = matched_context(page, &query.text);
                context.truncate(CONTEXT_LINES_PER_HIT);
                hits.push(SearchHit {
                    project: project.name.clone(),
                    title: page.title.clone(),
                    relevance_score: score,
                    tags: page.tags.clone(),
                    creative_type: page.metadata.creative_type,
                    context,
                    word_count: page.metadata.word_count,
                });
            }
        }
    }

    hits.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
    let total_results = hits.len();
    hits.truncate(query.applied_limit());

    debug!(
        "event=search module=search status=ok total={} returned={} duration_ms={}",
        total_results,
        hits.len(),
        started_at.elapsed().as_millis()
    );

    SearchResults {
        query: query.text.clone(),
        total_results,
        results: hits,
    }
}

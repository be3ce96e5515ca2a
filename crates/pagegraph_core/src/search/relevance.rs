//! Heuristic relevance scoring.
//!
//! # Responsibility
//! - Score one page against a free-text query.
//! - Extract the raw lines that contain the query.
//!
//! # Invariants
//! - Title and tag checks use the whole lowercased query as a substring.
//! - Content checks count each whitespace-split token literally. Query
//!   tokens are never interpreted as patterns.

use crate::model::page::Page;

pub const TITLE_MATCH_SCORE: f64 = 3.0;
pub const TAG_MATCH_SCORE: f64 = 2.0;
pub const TERM_OCCURRENCE_SCORE: f64 = 0.1;
pub const MAX_MATCHED_CONTEXT_LINES: usize = 5;

/// Counts query-term occurrences in lowercased page content.
pub trait TermMatcher {
    fn count_occurrences(&self, haystack: &str, term: &str) -> usize;
}

/// Non-overlapping literal substring counting.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralTermMatcher;

impl TermMatcher for LiteralTermMatcher {
    fn count_occurrences(&self, haystack: &str, term: &str) -> usize {
        if term.is_empty() {
            return 0;
        }
        haystack.matches(term).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RelevanceScorer<M = LiteralTermMatcher> {
    matcher: M,
}

impl RelevanceScorer<LiteralTermMatcher> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: TermMatcher> RelevanceScorer<M> {
    pub fn with_matcher(matcher: M) -> Self {
        Self { matcher }
    }

    /// Returns the relevance of `page` for `query`; `0.0` means no match.
    pub fn score(&self, page: &Page, query: &str) -> f64 {
        let lower_query = query.to_lowercase();
        let mut score = 0.0;

        if page.title.to_lowercase().contains(&lower_query) {
            score += TITLE_MATCH_SCORE;
        }

        if page
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&lower_query))
        {
            score += TAG_MATCH_SCORE;
        }

        let content = page.lines.join(" ").to_lowercase();
        for term in lower_query.split_whitespace() {
            let occurrences = self.matcher.count_occurrences(&content, term);
            score += occurrences as f64 * TERM_OCCURRENCE_SCORE;
        }

        score
    }
}

/// Returns up to five raw lines containing `query`, case-insensitively.
pub fn matched_context(page: &Page, query: &str) -> Vec<String> {
    let lower_query = query.to_lowercase();
    page.lines
        .iter()
        .filter(|line| line.to_lowercase().contains(&lower_query))
        .take(MAX_MATCHED_CONTEXT_LINES)
        .cloned()
        .collect()
}

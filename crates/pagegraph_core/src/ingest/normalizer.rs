//! Raw page normalization.
//!
//! # Responsibility
//! - Turn a `RawPage` into a canonical `Page`.
//! - Extract tags and bracket links, compute the character count and the
//!   creative-type label.
//!
//! # Invariants
//! - Tag grammar is `#` followed by one or more characters that are neither
//!   whitespace nor `#`. No other tag grammar is used inside the engine.
//! - Link text is the verbatim inner text of `[...]`, without trimming.
//! - Missing raw fields default to empty values; normalization never fails.

use crate::model::page::{CreativeType, Page, PageMetadata, RawLine, RawPage};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([^\s#]+)").expect("valid tag regex"));
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid link regex"));

/// Keyword groups checked in priority order. First hit wins.
const CREATIVE_KEYWORDS: &[(CreativeType, &[&str])] = &[
    (CreativeType::Poetry, &["詩", "poem"]),
    (CreativeType::Criticism, &["批評", "criticism"]),
    (CreativeType::Essay, &["エッセイ", "essay"]),
    (CreativeType::Diary, &["日記", "diary"]),
];

/// Assigns one creative-type label to page content.
///
/// The keyword heuristic is deliberately naive; this trait is the seam for
/// replacing it.
pub trait CreativeClassifier {
    fn classify(&self, content: &str) -> CreativeType;
}

/// Case-insensitive keyword scan, defaulting to `CreativeType::Note`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl CreativeClassifier for KeywordClassifier {
    fn classify(&self, content: &str) -> CreativeType {
        let lowered = content.to_lowercase();
        CREATIVE_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
            .map_or(CreativeType::Note, |(kind, _)| *kind)
    }
}

/// Converts raw records into normalized pages.
#[derive(Debug, Clone, Default)]
pub struct PageNormalizer<C = KeywordClassifier> {
    classifier: C,
}

impl PageNormalizer<KeywordClassifier> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: CreativeClassifier> PageNormalizer<C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    /// Normalizes one raw page. `backlinks` is left empty for the indexer.
    pub fn normalize(&self, raw: RawPage) -> Page {
        let lines = raw
            .lines
            .unwrap_or_default()
            .into_iter()
            .filter_map(RawLine::into_text)
            .collect::<Vec<_>>();
        let tags = extract_tags(&lines);
        let links = extract_links(&lines);
        let content = lines.join("\n");

        let metadata = PageMetadata {
            word_count: content.chars().count(),
            link_count: links.len(),
            creative_type: self.classifier.classify(&content),
        };

        Page {
            id: raw.id.unwrap_or_else(|| raw.title.clone()),
            title: raw.title,
            lines,
            created: raw.created.unwrap_or(0),
            updated: raw.updated.unwrap_or(0),
            tags,
            links,
            backlinks: Vec::new(),
            metadata,
        }
    }
}

/// Extracts unique tags (without `#`) in first-seen order.
pub fn extract_tags(lines: &[String]) -> Vec<String> {
    collect_unique(lines, &TAG_RE)
}

/// Extracts unique bracket link targets in first-seen order.
pub fn extract_links(lines: &[String]) -> Vec<String> {
    collect_unique(lines, &LINK_RE)
}

fn collect_unique(lines: &[String], pattern: &Regex) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut values = Vec::new();
    for line in lines {
        for caps in pattern.captures_iter(line) {
            let Some(matched) = caps.get(1) else {
                continue;
            };
            if seen.insert(matched.as_str()) {
                values.push(matched.as_str().to_string());
            }
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::{extract_links, extract_tags, CreativeClassifier, KeywordClassifier};
    use crate::model::page::CreativeType;

    fn lines(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn tags_stop_at_whitespace_and_hash() {
        let tags = extract_tags(&lines(&["#one #two#three", "mid#four end", "# lonely"]));
        assert_eq!(tags, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn tags_are_deduplicated_in_first_seen_order() {
        let tags = extract_tags(&lines(&["#b #a", "#b again"]));
        assert_eq!(tags, vec!["b", "a"]);
    }

    #[test]
    fn links_keep_inner_text_verbatim() {
        let links = extract_links(&lines(&["see [ spaced title ] and [other]", "[other]"]));
        assert_eq!(links, vec![" spaced title ", "other"]);
    }

    #[test]
    fn unterminated_or_empty_brackets_do_not_match() {
        assert!(extract_links(&lines(&["[open only", "[]"])).is_empty());
    }

    #[test]
    fn classifier_follows_priority_order() {
        let classifier = KeywordClassifier;
        assert_eq!(classifier.classify("An essay about a POEM"), CreativeType::Poetry);
        assert_eq!(classifier.classify("essay and criticism"), CreativeType::Criticism);
        assert_eq!(classifier.classify("今日の日記"), CreativeType::Diary);
        assert_eq!(classifier.classify("エッセイ"), CreativeType::Essay);
        assert_eq!(classifier.classify("shopping list"), CreativeType::Note);
    }
}

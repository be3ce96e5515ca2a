//! Corpus indexing into immutable project snapshots.
//!
//! # Responsibility
//! - Normalize raw batches in caller order and concatenate their pages.
//! - Compute backlinks, the tag index and the link graph.
//! - Produce one `Project` snapshot per build.
//!
//! # Invariants
//! - `Q.title ∈ P.backlinks ⇔ P.title ∈ Q.links` for pages of one snapshot.
//! - Pages from several batches are concatenated without title dedup.
//! - For a fixed input order, every derived index is deterministic.

use crate::ingest::normalizer::{CreativeClassifier, KeywordClassifier, PageNormalizer};
use crate::model::page::{Page, RawExport};
use crate::model::project::Project;
use chrono::Utc;
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use uuid::Uuid;

/// Naming inputs for one snapshot build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectIdentity {
    pub name: String,
    /// Falls back to the first batch's display name, then to `name`.
    pub display_name: Option<String>,
    pub description: Option<String>,
}

impl ProjectIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Builds project snapshots from raw export batches.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndexer<C = KeywordClassifier> {
    normalizer: PageNormalizer<C>,
}

impl CorpusIndexer<KeywordClassifier> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: CreativeClassifier> CorpusIndexer<C> {
    pub fn with_normalizer(normalizer: PageNormalizer<C>) -> Self {
        Self { normalizer }
    }

    /// Indexes a single export. The display name defaults to the project name.
    pub fn index_export(&self, identity: ProjectIdentity, export: RawExport) -> Project {
        let pages = self.normalize_batch(&identity.name, 1, export);
        let display_name = identity
            .display_name
            .clone()
            .unwrap_or_else(|| identity.name.clone());
        self.build(identity, display_name, pages)
    }

    /// Indexes several batches strictly in the given order.
    ///
    /// The display name defaults to the first batch's `displayName`.
    pub fn index_batches(&self, identity: ProjectIdentity, batches: Vec<RawExport>) -> Project {
        let display_name = identity
            .display_name
            .clone()
            .or_else(|| {
                batches
                    .first()
                    .and_then(|batch| batch.display_name.clone())
            })
            .unwrap_or_else(|| identity.name.clone());

        let mut pages = Vec::new();
        for (index, batch) in batches.into_iter().enumerate() {
            let normalized = self.normalize_batch(&identity.name, index + 1, batch);
            pages.extend(normalized);
        }
        self.build(identity, display_name, pages)
    }

    fn normalize_batch(&self, project: &str, part: usize, batch: RawExport) -> Vec<Page> {
        let pages = batch
            .pages
            .into_iter()
            .map(|raw| self.normalizer.normalize(raw))
            .collect::<Vec<_>>();
        debug!(
            "event=batch_normalize module=ingest status=ok project={} part={} pages={}",
            project,
            part,
            pages.len()
        );
        pages
    }

    fn build(&self, identity: ProjectIdentity, display_name: String, mut pages: Vec<Page>) -> Project {
        let started_at = Instant::now();
        compute_backlinks(&mut pages);
        let tag_index = build_tag_index(&pages);
        let link_graph = build_link_graph(&pages);

        let project = Project {
            snapshot_id: Uuid::new_v4(),
            name: identity.name,
            display_name,
            description: identity.description,
            pages,
            tag_index,
            link_graph,
            last_updated: Utc::now().timestamp_millis(),
        };

        info!(
            "event=project_index module=ingest status=ok project={} snapshot_id={} pages={} tags={} duration_ms={}",
            project.name,
            project.snapshot_id,
            project.pages.len(),
            project.tag_index.len(),
            started_at.elapsed().as_millis()
        );
        project
    }
}

/// Assigns every page the titles of pages linking to it.
///
/// One pass over all links builds `referenced title -> referencing titles`;
/// a second pass assigns each page its entry.
pub fn compute_backlinks(pages: &mut [Page]) {
    let mut referrers: HashMap<String, Vec<String>> = HashMap::new();
    for page in pages.iter() {
        for linked_title in &page.links {
            referrers
                .entry(linked_title.clone())
                .or_default()
                .push(page.title.clone());
        }
    }

    for page in pages.iter_mut() {
        page.backlinks = referrers.get(&page.title).cloned().unwrap_or_default();
    }
}

/// Groups titles by tag, preserving page order inside each tag.
pub fn build_tag_index(pages: &[Page]) -> BTreeMap<String, Vec<String>> {
    let mut tag_index: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for page in pages {
        for tag in &page.tags {
            tag_index
                .entry(tag.clone())
                .or_default()
                .push(page.title.clone());
        }
    }
    tag_index
}

/// Maps each title to its links followed by its backlinks.
///
/// With duplicate titles, the later page's entry wins.
pub fn build_link_graph(pages: &[Page]) -> BTreeMap<String, Vec<String>> {
    pages
        .iter()
        .map(|page| {
            let neighbors = page
                .links
                .iter()
                .chain(page.backlinks.iter())
                .cloned()
                .collect::<Vec<_>>();
            (page.title.clone(), neighbors)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{build_link_graph, compute_backlinks, CorpusIndexer, ProjectIdentity};
    use crate::ingest::normalizer::PageNormalizer;
    use crate::model::page::{RawExport, RawPage};

    #[test]
    fn backlinks_include_self_links_and_repeat_referrers() {
        let normalizer = PageNormalizer::new();
        let mut pages = vec![
            normalizer.normalize(RawPage::new("A", ["[A] [B]"])),
            normalizer.normalize(RawPage::new("B", ["[B]"])),
        ];
        compute_backlinks(&mut pages);
        assert_eq!(pages[0].backlinks, vec!["A"]);
        assert_eq!(pages[1].backlinks, vec!["A", "B"]);
    }

    #[test]
    fn link_graph_concatenates_links_then_backlinks_with_duplicates() {
        let normalizer = PageNormalizer::new();
        let mut pages = vec![
            normalizer.normalize(RawPage::new("A", ["[B]"])),
            normalizer.normalize(RawPage::new("B", ["[A]"])),
        ];
        compute_backlinks(&mut pages);
        let graph = build_link_graph(&pages);
        assert_eq!(graph["A"], vec!["B", "B"]);
        assert_eq!(graph["B"], vec!["A", "A"]);
    }

    #[test]
    fn batch_display_name_comes_from_first_batch() {
        let mut first = RawExport::from_pages(vec![RawPage::new("one", ["x"])]);
        first.display_name = Some("First Part".to_string());
        let mut second = RawExport::from_pages(vec![RawPage::new("two", ["y"])]);
        second.display_name = Some("Second Part".to_string());

        let project =
            CorpusIndexer::new().index_batches(ProjectIdentity::new("split"), vec![first, second]);
        assert_eq!(project.display_name, "First Part");
        assert_eq!(project.pages.len(), 2);

        let single = CorpusIndexer::new().index_export(
            ProjectIdentity::new("single"),
            RawExport::from_pages(vec![RawPage::new("one", ["x"])]),
        );
        assert_eq!(single.display_name, "single");
    }
}

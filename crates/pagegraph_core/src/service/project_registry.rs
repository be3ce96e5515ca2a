//! Named project registry and the public query operations.
//!
//! # Responsibility
//! - Own the `name -> Project` mapping as an explicit context object.
//! - Build snapshots from raw input or page sources and register them.
//! - Resolve names for search, connection analysis, theme extraction and
//!   catalog reads.
//!
//! # Invariants
//! - Names are case-sensitive and unique; registering a name again replaces
//!   the whole snapshot.
//! - Snapshots are shared as `Arc<Project>`: callers holding an old snapshot
//!   keep reading it unchanged after a replacement.
//! - A failed load registers nothing.

use crate::analysis::connections::{analyze_connections, ConnectionQuery, ConnectionReport};
use crate::analysis::themes::{extract_themes, ThemeQuery, ThemeReport};
use crate::config::{LibraryConfig, SourcePlan};
use crate::error::{EngineError, EngineResult};
use crate::ingest::indexer::{CorpusIndexer, ProjectIdentity};
use crate::ingest::normalizer::{CreativeClassifier, KeywordClassifier};
use crate::ingest::source::PageSource;
use crate::model::page::RawExport;
use crate::model::project::Project;
use crate::search::relevance::{LiteralTermMatcher, RelevanceScorer, TermMatcher};
use crate::search::{search_pages, SearchQuery, SearchResults};
use crate::service::catalog::{page_summaries, tag_summaries, PageSummary, ProjectSummary, TagSummary};
use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Raw input for one project build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectInput {
    Export(RawExport),
    /// Split export parts, indexed strictly in this order.
    Batches(Vec<RawExport>),
}

/// Names of projects handled by `load_config`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLoadSummary {
    pub loaded: Vec<String>,
    /// Projects that need a remote fetch.
    pub skipped: Vec<String>,
}

/// Registry of project snapshots plus the engine components querying them.
#[derive(Debug, Default)]
pub struct ProjectRegistry<C = KeywordClassifier, M = LiteralTermMatcher> {
    projects: BTreeMap<String, Arc<Project>>,
    indexer: CorpusIndexer<C>,
    scorer: RelevanceScorer<M>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: CreativeClassifier, M: TermMatcher> ProjectRegistry<C, M> {
    /// Creates a registry with custom classification and term matching.
    pub fn with_components(indexer: CorpusIndexer<C>, scorer: RelevanceScorer<M>) -> Self {
        Self {
            projects: BTreeMap::new(),
            indexer,
            scorer,
        }
    }

    /// Builds and registers a snapshot, replacing any previous one.
    pub fn add_project(&mut self, name: &str, input: ProjectInput) -> Arc<Project> {
        self.add_described_project(ProjectIdentity::new(name), input)
    }

    /// Same as `add_project`, with display name and description control.
    pub fn add_described_project(
        &mut self,
        identity: ProjectIdentity,
        input: ProjectInput,
    ) -> Arc<Project> {
        let project = match input {
            ProjectInput::Export(export) => self.indexer.index_export(identity, export),
            ProjectInput::Batches(batches) => self.indexer.index_batches(identity, batches),
        };
        self.register(project)
    }

    /// Loads the given batches from `source` and registers the snapshot.
    ///
    /// One batch id is indexed as a single export; several as split parts.
    ///
    /// # Errors
    /// - `EngineError::SourceUnavailable` naming the first failing batch.
    ///   Nothing is registered in that case.
    pub fn load_project(
        &mut self,
        identity: ProjectIdentity,
        source: &impl PageSource,
        batch_ids: &[String],
    ) -> EngineResult<Arc<Project>> {
        let mut batches = source
            .load_batches(batch_ids)
            .map_err(|(source_id, error)| {
                warn!(
                    "event=project_load module=service status=error project={} source_id={} error={}",
                    identity.name, source_id, error
                );
                EngineError::SourceUnavailable { source_id, error }
            })?;

        let input = if batches.len() == 1 {
            ProjectInput::Export(batches.remove(0))
        } else {
            ProjectInput::Batches(batches)
        };
        Ok(self.add_described_project(identity, input))
    }

    /// Loads every configured project that has local export files.
    ///
    /// Projects without export files would need a remote fetch; they are
    /// logged and skipped.
    ///
    /// # Errors
    /// - The first `EngineError::SourceUnavailable`; projects loaded before
    ///   it stay registered.
    pub fn load_config(
        &mut self,
        config: &LibraryConfig,
        source: &impl PageSource,
    ) -> EngineResult<ConfigLoadSummary> {
        let mut summary = ConfigLoadSummary::default();
        for project in &config.projects {
            let identity = ProjectIdentity::new(project.name.clone())
                .with_description(project.description.clone());
            match project.source_plan() {
                SourcePlan::Batches(paths) => {
                    self.load_project(identity, source, paths)?;
                }
                SourcePlan::Single(path) => {
                    self.load_project(identity, source, &[path.to_string()])?;
                }
                SourcePlan::Remote => {
                    warn!(
                        "event=project_load module=service status=skip project={} reason=no_local_export",
                        project.name
                    );
                    summary.skipped.push(project.name.clone());
                    continue;
                }
            }
            summary.loaded.push(project.name.clone());
        }
        Ok(summary)
    }

    fn register(&mut self, project: Project) -> Arc<Project> {
        let project = Arc::new(project);
        let replaced = self
            .projects
            .insert(project.name.clone(), Arc::clone(&project));
        info!(
            "event=project_register module=service status=ok project={} snapshot_id={} replaced={}",
            project.name,
            project.snapshot_id,
            replaced.is_some()
        );
        project
    }

    /// Removes a project. Returns the removed snapshot, if any.
    pub fn remove_project(&mut self, name: &str) -> Option<Arc<Project>> {
        self.projects.remove(name)
    }

    /// Returns a shared handle to a snapshot.
    pub fn get(&self, name: &str) -> Option<Arc<Project>> {
        self.projects.get(name).cloned()
    }

    /// Returns a snapshot or `ProjectNotFound`.
    pub fn project(&self, name: &str) -> EngineResult<Arc<Project>> {
        self.get(name)
            .ok_or_else(|| EngineError::ProjectNotFound(name.to_string()))
    }

    /// Registered names in iteration (name) order.
    pub fn project_names(&self) -> Vec<String> {
        self.projects.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Searches the filtered projects, or all of them in name order.
    ///
    /// Unknown names in the project filter are skipped.
    pub fn search(&self, query: &SearchQuery) -> SearchResults {
        let selected: Vec<&Project> = match query.project_filter() {
            Some(names) => names
                .iter()
                .filter_map(|name| self.projects.get(name).map(Arc::as_ref))
                .collect(),
            None => self.projects.values().map(Arc::as_ref).collect(),
        };
        search_pages(selected, query, &self.scorer)
    }

    /// # Errors
    /// - `ProjectNotFound` or `PageNotFound`.
    pub fn analyze_connections(
        &self,
        project_name: &str,
        page_title: &str,
        query: &ConnectionQuery,
    ) -> EngineResult<ConnectionReport> {
        let project = self.project(project_name)?;
        analyze_connections(&project, page_title, query)
    }

    /// # Errors
    /// - `ProjectNotFound`.
    pub fn extract_themes(&self, project_name: &str, query: &ThemeQuery) -> EngineResult<ThemeReport> {
        let project = self.project(project_name)?;
        Ok(extract_themes(&project, query))
    }

    pub fn list_projects(&self) -> Vec<ProjectSummary> {
        self.projects
            .values()
            .map(|project| ProjectSummary::from(project.as_ref()))
            .collect()
    }

    /// # Errors
    /// - `ProjectNotFound`.
    pub fn list_pages(&self, project_name: &str) -> EngineResult<Vec<PageSummary>> {
        let project = self.project(project_name)?;
        Ok(page_summaries(&project))
    }

    /// Returns page lines joined by `\n`.
    ///
    /// # Errors
    /// - `ProjectNotFound` or `PageNotFound`.
    pub fn page_text(&self, project_name: &str, page_title: &str) -> EngineResult<String> {
        let project = self.project(project_name)?;
        project
            .page(page_title)
            .map(|page| page.content())
            .ok_or_else(|| EngineError::PageNotFound {
                project: project_name.to_string(),
                title: page_title.to_string(),
            })
    }

    /// # Errors
    /// - `ProjectNotFound`.
    pub fn list_tags(&self, project_name: &str) -> EngineResult<Vec<TagSummary>> {
        let project = self.project(project_name)?;
        Ok(tag_summaries(&project))
    }
}

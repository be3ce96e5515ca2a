//! Connection analysis from one starting page.
//!
//! # Responsibility
//! - Enumerate direct-link and tag-similarity edges of a start page.
//!
//! # Invariants
//! - Single hop only: `depth` is accepted but never expands the frontier.
//! - Edges are emitted as all direct links in link order, then all tag
//!   similarities in project page order. Capping never re-sorts.
//! - Tag similarity is `|shared| / max(|start tags|, |other tags|)`.
//! - Content similarity has no scoring rule and yields no edges.

use crate::error::{EngineError, EngineResult};
use crate::model::page::Page;
use crate::model::project::Project;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONNECTION_DEPTH: u32 = 2;
pub const DEFAULT_CONNECTION_LIMIT: usize = 20;
pub const DIRECT_LINK_STRENGTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    DirectLink,
    TagSimilarity,
    ContentSimilarity,
}

impl ConnectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectLink => "direct_link",
            Self::TagSimilarity => "tag_similarity",
            Self::ContentSimilarity => "content_similarity",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "direct_link" => Some(Self::DirectLink),
            "tag_similarity" => Some(Self::TagSimilarity),
            "content_similarity" => Some(Self::ContentSimilarity),
            _ => None,
        }
    }
}

/// One directed edge from the start page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub connection_type: ConnectionType,
    pub strength: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionQuery {
    /// Defaults to `DEFAULT_CONNECTION_DEPTH`. Multi-hop is not implemented.
    pub depth: Option<u32>,
    /// `None` means direct links and tag similarity. An empty list yields no edges.
    pub types: Option<Vec<ConnectionType>>,
    /// Defaults to `DEFAULT_CONNECTION_LIMIT`.
    pub limit: Option<usize>,
}

impl ConnectionQuery {
    fn wants(&self, kind: ConnectionType) -> bool {
        match self.types.as_deref() {
            Some(types) => types.contains(&kind),
            None => kind != ConnectionType::ContentSimilarity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub source_page: String,
    /// Edge count before the limit is applied.
    pub total_connections: usize,
    pub connections: Vec<Connection>,
}

/// Analyzes the direct neighbors of `page_title` within `project`.
///
/// # Errors
/// - `EngineError::PageNotFound` when no page has this title.
pub fn analyze_connections(
    project: &Project,
    page_title: &str,
    query: &ConnectionQuery,
) -> EngineResult<ConnectionReport> {
    let start = project
        .page(page_title)
        .ok_or_else(|| EngineError::PageNotFound {
            project: project.name.clone(),
            title: page_title.to_string(),
        })?;

    let depth = query.depth.unwrap_or(DEFAULT_CONNECTION_DEPTH);
    if depth > 1 {
        debug!(
            "event=connections module=analysis status=skip reason=single_hop_only depth={}",
            depth
        );
    }

    let mut connections = Vec::new();
    if query.wants(ConnectionType::DirectLink) {
        connections.extend(direct_link_edges(start));
    }
    if query.wants(ConnectionType::TagSimilarity) {
        connections.extend(tag_similarity_edges(project, start));
    }
    if query.wants(ConnectionType::ContentSimilarity) {
        warn!(
            "event=connections module=analysis status=skip reason=content_similarity_unsupported project={}",
            project.name
        );
    }

    let total_connections = connections.len();
    connections.truncate(query.limit.unwrap_or(DEFAULT_CONNECTION_LIMIT));

    Ok(ConnectionReport {
        source_page: start.title.clone(),
        total_connections,
        connections,
    })
}

/// Shared-tag ratio normalized by the larger tag set.
///
/// Returns `0.0` when either side has no tags.
pub fn tag_similarity(a: &[String], b: &[String]) -> f64 {
    let larger = a.len().max(b.len());
    if larger == 0 {
        return 0.0;
    }
    let shared = a.iter().filter(|tag| b.contains(*tag)).count();
    shared as f64 / larger as f64
}

fn direct_link_edges(start: &Page) -> impl Iterator<Item = Connection> + '_ {
    start.links.iter().map(|target| Connection {
        source: start.title.clone(),
        target: target.clone(),
        connection_type: ConnectionType::DirectLink,
        strength: DIRECT_LINK_STRENGTH,
    })
}

fn tag_similarity_edges<'a>(
    project: &'a Project,
    start: &'a Page,
) -> impl Iterator<Item = Connection> + 'a {
    project
        .pages
        .iter()
        .filter(move |other| other.title != start.title)
        .filter_map(move |other| {
            let strength = tag_similarity(&start.tags, &other.tags);
            (strength > 0.0).then(|| Connection {
                source: start.title.clone(),
                target: other.title.clone(),
                connection_type: ConnectionType::TagSimilarity,
                strength,
            })
        })
}

//! Core indexing and query engine for page-graph knowledge base exports.
//! This crate owns every snapshot and query invariant; transports stay thin.

pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;

pub use analysis::connections::{
    Connection, ConnectionQuery, ConnectionReport, ConnectionType,
};
pub use analysis::themes::{DateRange, DateRangeError, Theme, ThemeQuery, ThemeReport};
pub use config::{load_config, resolve_config_path, ConfigError, LibraryConfig, ProjectConfig};
pub use error::{EngineError, EngineResult};
pub use ingest::indexer::{CorpusIndexer, ProjectIdentity};
pub use ingest::normalizer::{CreativeClassifier, KeywordClassifier, PageNormalizer};
pub use ingest::source::{ExportFileSource, LoadError, PageSource};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingOptions};
pub use model::page::{CreativeType, Page, PageMetadata, RawExport, RawLine, RawPage};
pub use model::project::Project;
pub use search::relevance::{LiteralTermMatcher, RelevanceScorer, TermMatcher};
pub use search::{SearchHit, SearchQuery, SearchResults};
pub use service::catalog::{PageSummary, ProjectSummary, TagSummary};
pub use service::project_registry::{ConfigLoadSummary, ProjectInput, ProjectRegistry};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

//! Public error taxonomy of the query engine.
//!
//! Only lookups by name and source loading fail. Malformed page records are
//! absorbed during normalization and never surface here.

use crate::ingest::source::LoadError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug)]
pub enum EngineError {
    ProjectNotFound(String),
    PageNotFound {
        project: String,
        title: String,
    },
    /// Raw data for a project could not be obtained or parsed.
    SourceUnavailable {
        source_id: String,
        error: LoadError,
    },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(name) => write!(f, "project not found: {name}"),
            Self::PageNotFound { project, title } => {
                write!(f, "page not found: `{title}` in project `{project}`")
            }
            Self::SourceUnavailable { source_id, error } => {
                write!(f, "source unavailable: `{source_id}`: {error}")
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SourceUnavailable { error, .. } => Some(error),
            _ => None,
        }
    }
}

//! Page source contracts and the export-file implementation.
//!
//! # Responsibility
//! - Define how the indexer receives fully materialized raw batches.
//! - Read export JSON files from disk.
//!
//! # Invariants
//! - A multi-batch load either returns every batch or fails; partial batch
//!   lists are never handed to the indexer.
//! - Sources do not retry. Failures are surfaced unchanged to the caller.

use crate::model::page::RawExport;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Error raised when raw data cannot be obtained or parsed.
#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The source has no way to produce this batch.
    Unsupported { batch_id: String },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read export `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid export format in `{}`: {source}", path.display())
            }
            Self::Unsupported { batch_id } => {
                write!(f, "no local source available for `{batch_id}`")
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Unsupported { .. } => None,
        }
    }
}

/// Supplier of raw export batches.
pub trait PageSource {
    /// Loads one batch identified by `batch_id`.
    fn load_export(&self, batch_id: &str) -> Result<RawExport, LoadError>;

    /// Loads several batches in caller order, stopping at the first failure.
    ///
    /// On failure, returns the failing batch id with its error.
    fn load_batches(&self, batch_ids: &[String]) -> Result<Vec<RawExport>, (String, LoadError)> {
        batch_ids
            .iter()
            .map(|batch_id| {
                self.load_export(batch_id)
                    .map_err(|err| (batch_id.clone(), err))
            })
            .collect()
    }
}

/// Reads export JSON files; batch ids are file paths.
#[derive(Debug, Clone, Default)]
pub struct ExportFileSource {
    base_dir: Option<PathBuf>,
}

impl ExportFileSource {
    /// Resolves relative batch paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative batch paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, batch_id: &str) -> PathBuf {
        let path = Path::new(batch_id);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl PageSource for ExportFileSource {
    fn load_export(&self, batch_id: &str) -> Result<RawExport, LoadError> {
        let started_at = Instant::now();
        let path = self.resolve(batch_id);

        let text = std::fs::read_to_string(&path).map_err(|source| {
            error!(
                "event=export_load module=ingest status=error error_code=io path={} error={}",
                path.display(),
                source
            );
            LoadError::Io {
                path: path.clone(),
                source,
            }
        })?;

        let export = parse_export(&text).map_err(|source| {
            error!(
                "event=export_load module=ingest status=error error_code=parse path={} error={}",
                path.display(),
                source
            );
            LoadError::Parse {
                path: path.clone(),
                source,
            }
        })?;

        info!(
            "event=export_load module=ingest status=ok path={} pages={} duration_ms={}",
            path.display(),
            export.pages.len(),
            started_at.elapsed().as_millis()
        );
        Ok(export)
    }
}

/// Parses one export document.
pub fn parse_export(text: &str) -> Result<RawExport, serde_json::Error> {
    serde_json::from_str(text)
}

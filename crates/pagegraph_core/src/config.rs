//! Library configuration file.
//!
//! # Responsibility
//! - Resolve and read the JSON configuration that lists projects and their
//!   export files.
//! - Decide which source each project is loaded from.
//!
//! # Invariants
//! - Project names are non-blank and unique within one file.
//! - Resolution order: explicit path, then `PAGEGRAPH_CONFIG_PATH`, then
//!   `./pagegraph-config.json`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "PAGEGRAPH_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "./pagegraph-config.json";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// One configured project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_data_path: Option<String>,
    /// Split export parts, loaded in this order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub export_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Where a project's raw pages come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePlan<'a> {
    Batches(&'a [String]),
    Single(&'a str),
    /// Needs a remote fetch, which this crate does not perform.
    Remote,
}

impl ProjectConfig {
    pub fn source_plan(&self) -> SourcePlan<'_> {
        if !self.export_paths.is_empty() {
            return SourcePlan::Batches(&self.export_paths);
        }
        match self.export_data_path.as_deref() {
            Some(path) if !path.trim().is_empty() => SourcePlan::Single(path),
            _ => SourcePlan::Remote,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
}

impl LibraryConfig {
    /// Parses and validates configuration text.
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::BTreeSet::new();
        for project in &self.projects {
            if project.name.trim().is_empty() {
                return Err(ConfigError::Invalid("project name cannot be empty".to_string()));
            }
            if !seen.insert(project.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate project name `{}`",
                    project.name
                )));
            }
        }
        Ok(())
    }

    /// Sample configuration printed when no config file exists.
    pub fn example() -> Self {
        Self {
            projects: vec![
                ProjectConfig {
                    name: "my-project".to_string(),
                    export_data_path: Some("./data/my-project-export.json".to_string()),
                    ..ProjectConfig::default()
                },
                ProjectConfig {
                    name: "my-split-project".to_string(),
                    export_paths: vec![
                        "./data/parts/my-project-part1.json".to_string(),
                        "./data/parts/my-project-part2.json".to_string(),
                        "./data/parts/my-project-part3.json".to_string(),
                    ],
                    ..ProjectConfig::default()
                },
            ],
        }
    }
}

/// Resolves the configuration path.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Reads and validates the configuration at `path`.
pub fn load_config(path: &Path) -> Result<LibraryConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    LibraryConfig::from_json(&text, path)
}

//! Command-line transport over the page-graph engine.
//!
//! # Responsibility
//! - Load the configured projects into a registry once per invocation.
//! - Map subcommands onto registry operations and print JSON to stdout.
//!
//! # Invariants
//! - Logs go to stderr or a log directory, never to stdout.
//! - No engine logic lives here; arguments are parsed and forwarded.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;
use pagegraph_core::{
    init_logging, load_config, resolve_config_path, ConnectionQuery, ConnectionType,
    CreativeType, DateRange, ExportFileSource, LibraryConfig, LoggingOptions, ProjectRegistry,
    SearchQuery, ThemeQuery,
};
use serde::Serialize;

const DEFAULT_CLI_LOG_LEVEL: &str = "warn";

#[derive(Parser)]
#[command(name = "pagegraph", version, about = "Query knowledge base page exports")]
struct Cli {
    /// Config file (default: $PAGEGRAPH_CONFIG_PATH or ./pagegraph-config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true, default_value = DEFAULT_CLI_LOG_LEVEL)]
    log_level: String,
    /// Write rotating log files here instead of stderr (absolute path)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a sample config file
    ExampleConfig,
    /// List loaded projects
    Projects,
    /// List pages of a project
    Pages { project: String },
    /// Print the text of one page
    Page { project: String, title: String },
    /// List tags of a project
    Tags { project: String },
    /// Keyword search across projects
    Search {
        query: String,
        /// Restrict to these projects (repeatable)
        #[arg(short, long = "project")]
        projects: Vec<String>,
        /// Keep pages with at least one of these tags (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// poetry|essay|criticism|note|diary
        #[arg(short = 'c', long, value_parser = parse_creative_type)]
        creative_type: Option<CreativeType>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Connections of one page
    Connections {
        project: String,
        title: String,
        #[arg(short, long)]
        depth: Option<u32>,
        /// direct_link|tag_similarity|content_similarity (repeatable)
        #[arg(short = 'k', long = "type", value_parser = parse_connection_type)]
        types: Vec<ConnectionType>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Tag themes of a project
    Themes {
        project: String,
        /// Range start, YYYY-MM-DD
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Range end, YYYY-MM-DD
        #[arg(long, requires = "start")]
        end: Option<String>,
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging = match &cli.log_dir {
        Some(dir) => LoggingOptions::directory(cli.log_level.as_str(), dir.as_path()),
        None => LoggingOptions::stderr(cli.log_level.as_str()),
    };
    init_logging(&logging).map_err(anyhow::Error::msg)?;

    if let Commands::ExampleConfig = cli.command {
        return print_json(&LibraryConfig::example());
    }

    let registry = load_registry(cli.config)?;

    match cli.command {
        Commands::ExampleConfig => Ok(()),
        Commands::Projects => print_json(&registry.list_projects()),
        Commands::Pages { project } => print_json(&registry.list_pages(&project)?),
        Commands::Page { project, title } => {
            println!("{}", registry.page_text(&project, &title)?);
            Ok(())
        }
        Commands::Tags { project } => print_json(&registry.list_tags(&project)?),
        Commands::Search {
            query,
            projects,
            tags,
            creative_type,
            limit,
        } => {
            let query = SearchQuery {
                text: query,
                projects: flag_list(projects),
                tags: flag_list(tags),
                creative_type,
                limit,
            };
            print_json(&registry.search(&query))
        }
        Commands::Connections {
            project,
            title,
            depth,
            types,
            limit,
        } => {
            let query = ConnectionQuery {
                depth,
                types: flag_list(types),
                limit,
            };
            print_json(&registry.analyze_connections(&project, &title, &query)?)
        }
        Commands::Themes {
            project,
            start,
            end,
            tags,
            limit,
        } => {
            let date_range = match (start, end) {
                (Some(start), Some(end)) => Some(DateRange::from_iso_dates(&start, &end)?),
                _ => None,
            };
            let query = ThemeQuery {
                date_range,
                tags: flag_list(tags),
                limit,
            };
            print_json(&registry.extract_themes(&project, &query)?)
        }
    }
}

fn load_registry(explicit: Option<PathBuf>) -> anyhow::Result<ProjectRegistry> {
    let path = resolve_config_path(explicit.as_deref());
    if !path.exists() {
        let sample = serde_json::to_string_pretty(&LibraryConfig::example())?;
        eprintln!(
            "config file `{}` not found; create one like:\n{sample}",
            path.display()
        );
        bail!("missing config file `{}`", path.display());
    }

    let config = load_config(&path)?;
    let mut registry = ProjectRegistry::new();
    let summary = registry
        .load_config(&config, &ExportFileSource::new())
        .with_context(|| format!("loading projects from `{}`", path.display()))?;
    info!(
        "event=cli_load module=cli status=ok loaded={} skipped={}",
        summary.loaded.len(),
        summary.skipped.len()
    );
    Ok(registry)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// An absent repeatable flag means no filter.
fn flag_list<T>(values: Vec<T>) -> Option<Vec<T>> {
    (!values.is_empty()).then_some(values)
}

fn parse_creative_type(value: &str) -> Result<CreativeType, String> {
    CreativeType::parse(value).ok_or_else(|| format!("unknown creative type `{value}`"))
}

fn parse_connection_type(value: &str) -> Result<ConnectionType, String> {
    ConnectionType::parse(value).ok_or_else(|| format!("unknown connection type `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::{flag_list, Cli, Commands};
    use clap::Parser;
    use pagegraph_core::{ConnectionType, CreativeType};

    #[test]
    fn search_arguments_parse_into_filters() {
        let cli = Cli::try_parse_from([
            "pagegraph", "search", "moon", "-p", "poems", "-t", "night", "-c", "poetry", "-n", "3",
        ])
        .expect("valid arguments");
        match cli.command {
            Commands::Search {
                query,
                projects,
                tags,
                creative_type,
                limit,
            } => {
                assert_eq!(query, "moon");
                assert_eq!(projects, vec!["poems".to_string()]);
                assert_eq!(tags, vec!["night".to_string()]);
                assert_eq!(creative_type, Some(CreativeType::Poetry));
                assert_eq!(limit, Some(3));
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn connection_types_are_validated() {
        let cli = Cli::try_parse_from([
            "pagegraph", "connections", "p", "Home", "--type", "tag_similarity",
        ])
        .expect("valid arguments");
        assert!(matches!(
            cli.command,
            Commands::Connections { types, .. } if types == vec![ConnectionType::TagSimilarity]
        ));

        assert!(Cli::try_parse_from(["pagegraph", "connections", "p", "Home", "--type", "semantic"]).is_err());
    }

    #[test]
    fn themes_require_both_dates() {
        assert!(Cli::try_parse_from(["pagegraph", "themes", "p", "--start", "2024-01-01"]).is_err());
    }

    #[test]
    fn absent_flags_leave_filters_unset() {
        assert_eq!(flag_list(Vec::<String>::new()), None);
        assert_eq!(flag_list(vec!["a".to_string()]), Some(vec!["a".to_string()]));
    }
}

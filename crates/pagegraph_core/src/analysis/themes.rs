//! Tag-frequency theme extraction.
//!
//! # Responsibility
//! - Narrow a project's pages by update-time range, then by tags.
//! - Aggregate tag frequencies over the narrowed subset.
//!
//! # Invariants
//! - Filters narrow sequentially: date range first, then tags.
//! - Theme frequency equals the number of selected pages carrying the tag.
//! - Ranking is descending by frequency; ties keep first-insertion order.
//! - `keywords` is reserved and always empty.

use crate::model::project::Project;
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_THEME_LIMIT: usize = 10;

/// Inclusive Unix-seconds range over `Page::updated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Builds a range from `YYYY-MM-DD` dates, each taken at UTC midnight.
    ///
    /// The end bound is therefore 00:00:00 of the end date.
    pub fn from_iso_dates(start: &str, end: &str) -> Result<Self, DateRangeError> {
        Ok(Self {
            start: midnight_utc(start)?,
            end: midnight_utc(end)?,
        })
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    InvalidDate(String),
}

impl Display for DateRangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for DateRangeError {}

fn midnight_utc(value: &str) -> Result<i64, DateRangeError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp())
        .ok_or_else(|| DateRangeError::InvalidDate(value.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeQuery {
    pub date_range: Option<DateRange>,
    /// Keep pages carrying at least one of these tags. An empty list keeps none.
    pub tags: Option<Vec<String>>,
    /// Defaults to `DEFAULT_THEME_LIMIT`.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub theme: String,
    pub frequency: usize,
    pub related_pages: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeReport {
    pub project_name: String,
    pub analyzed_pages: usize,
    pub themes: Vec<Theme>,
}

/// Extracts ranked tag themes from `project`.
pub fn extract_themes(project: &Project, query: &ThemeQuery) -> ThemeReport {
    let mut selected = project.pages.iter().collect::<Vec<_>>();

    if let Some(range) = query.date_range {
        selected.retain(|page| range.contains(page.updated));
    }
    if let Some(tags) = query.tags.as_deref() {
        selected.retain(|page| page.has_any_tag(tags));
    }

    let mut themes: Vec<Theme> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for page in &selected {
        for tag in &page.tags {
            let position = *positions.entry(tag.as_str()).or_insert_with(|| {
                themes.push(Theme {
                    theme: tag.clone(),
                    frequency: 0,
                    related_pages: Vec::new(),
                    keywords: Vec::new(),
                });
                themes.len() - 1
            });
            let theme = &mut themes[position];
            theme.frequency += 1;
            theme.related_pages.push(page.title.clone());
        }
    }

    themes.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    themes.truncate(query.limit.unwrap_or(DEFAULT_THEME_LIMIT));

    debug!(
        "event=themes module=analysis status=ok project={} analyzed_pages={} themes={}",
        project.name,
        selected.len(),
        themes.len()
    );

    ThemeReport {
        project_name: project.name.clone(),
        analyzed_pages: selected.len(),
        themes,
    }
}

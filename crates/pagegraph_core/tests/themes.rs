use pagegraph_core::{
    DateRange, EngineError, ProjectInput, ProjectRegistry, RawExport, RawPage, ThemeQuery,
};

const DAY: i64 = 86_400;
const JAN_1_2024: i64 = 1_704_067_200;

fn registry_with(pages: Vec<RawPage>) -> ProjectRegistry {
    let mut registry = ProjectRegistry::new();
    registry.add_project("journal", ProjectInput::Export(RawExport::from_pages(pages)));
    registry
}

#[test]
fn ties_resolve_by_first_insertion_order() {
    let registry = registry_with(vec![
        RawPage::new("One", ["#a"]),
        RawPage::new("Two", ["#a #b"]),
        RawPage::new("Three", ["#b"]),
    ]);

    let query = ThemeQuery {
        limit: Some(1),
        ..ThemeQuery::default()
    };
    let report = registry.extract_themes("journal", &query).unwrap();

    assert_eq!(report.project_name, "journal");
    assert_eq!(report.analyzed_pages, 3);
    assert_eq!(report.themes.len(), 1);
    assert_eq!(report.themes[0].theme, "a");
    assert_eq!(report.themes[0].frequency, 2);
    assert_eq!(report.themes[0].related_pages, vec!["One", "Two"]);
    assert!(report.themes[0].keywords.is_empty());
}

#[test]
fn frequency_counts_pages_in_the_selected_subset() {
    let registry = registry_with(vec![
        RawPage::new("A", ["#x #x #y"]),
        RawPage::new("B", ["#y"]),
        RawPage::new("C", ["#y #z"]),
    ]);

    let report = registry
        .extract_themes("journal", &ThemeQuery::default())
        .unwrap();

    let summary = report
        .themes
        .iter()
        .map(|theme| (theme.theme.as_str(), theme.frequency, theme.related_pages.len()))
        .collect::<Vec<_>>();
    assert_eq!(summary, vec![("y", 3, 3), ("x", 1, 1), ("z", 1, 1)]);
}

#[test]
fn date_range_filters_before_tags() {
    let registry = registry_with(vec![
        RawPage::new("Old", ["#travel"]).with_timestamps(JAN_1_2024 - DAY, JAN_1_2024 - DAY),
        RawPage::new("Start", ["#travel #food"]).with_timestamps(JAN_1_2024, JAN_1_2024),
        RawPage::new("Edge", ["#food"]).with_timestamps(JAN_1_2024, JAN_1_2024 + DAY),
        RawPage::new("Late", ["#travel"]).with_timestamps(JAN_1_2024, JAN_1_2024 + DAY + 1),
    ]);

    let range = DateRange::from_iso_dates("2024-01-01", "2024-01-02").unwrap();
    let by_date = registry
        .extract_themes(
            "journal",
            &ThemeQuery {
                date_range: Some(range),
                ..ThemeQuery::default()
            },
        )
        .unwrap();
    assert_eq!(by_date.analyzed_pages, 2);
    assert_eq!(by_date.themes[0].theme, "food");
    assert_eq!(by_date.themes[0].related_pages, vec!["Start", "Edge"]);

    let by_date_and_tag = registry
        .extract_themes(
            "journal",
            &ThemeQuery {
                date_range: Some(range),
                tags: Some(vec!["travel".to_string()]),
                limit: None,
            },
        )
        .unwrap();
    assert_eq!(by_date_and_tag.analyzed_pages, 1);
    let themes = by_date_and_tag
        .themes
        .iter()
        .map(|theme| theme.theme.as_str())
        .collect::<Vec<_>>();
    assert_eq!(themes, vec!["travel", "food"]);
}

#[test]
fn empty_selection_produces_no_themes() {
    let registry = registry_with(vec![RawPage::new("Untagged", ["plain text"])]);

    let report = registry
        .extract_themes(
            "journal",
            &ThemeQuery {
                tags: Some(vec!["none".to_string()]),
                ..ThemeQuery::default()
            },
        )
        .unwrap();
    assert_eq!(report.analyzed_pages, 0);
    assert!(report.themes.is_empty());
}

#[test]
fn default_limit_caps_theme_count() {
    let line = (0..12).map(|index| format!("#t{index}")).collect::<Vec<_>>().join(" ");
    let registry = registry_with(vec![RawPage::new("Many", [line])]);

    let report = registry
        .extract_themes("journal", &ThemeQuery::default())
        .unwrap();
    assert_eq!(report.themes.len(), 10);
    assert_eq!(report.themes[0].theme, "t0");
}

#[test]
fn unknown_project_is_reported() {
    let err = registry_with(Vec::new())
        .extract_themes("nope", &ThemeQuery::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::ProjectNotFound(_)));
}

#[test]
fn empty_tag_list_selects_no_pages() {
    let registry = registry_with(vec![RawPage::new("Tagged", ["#a"])]);

    let report = registry
        .extract_themes(
            "journal",
            &ThemeQuery {
                tags: Some(Vec::new()),
                ..ThemeQuery::default()
            },
        )
        .unwrap();
    assert_eq!(report.analyzed_pages, 0);
    assert!(report.themes.is_empty());
}

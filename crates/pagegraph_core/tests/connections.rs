use pagegraph_core::{
    ConnectionQuery, ConnectionType, EngineError, ProjectInput, ProjectRegistry, RawExport,
    RawPage,
};

fn garden() -> ProjectRegistry {
    let mut registry = ProjectRegistry::new();
    registry.add_project(
        "garden",
        ProjectInput::Export(RawExport::from_pages(vec![
            RawPage::new("Roses", ["grow near [Tulips] and [Ferns]", "#flower #red"]),
            RawPage::new("Tulips", ["#flower #spring"]),
            RawPage::new("Ferns", ["#shade"]),
            RawPage::new("Poppies", ["#flower #red #field"]),
        ])),
    );
    registry
}

#[test]
fn default_query_returns_direct_links_then_tag_similarity() {
    let report = garden()
        .analyze_connections("garden", "Roses", &ConnectionQuery::default())
        .expect("known page");

    assert_eq!(report.source_page, "Roses");
    assert_eq!(report.total_connections, 4);
    let edges = report
        .connections
        .iter()
        .map(|edge| (edge.target.as_str(), edge.connection_type, edge.strength))
        .collect::<Vec<_>>();
    assert_eq!(
        edges,
        vec![
            ("Tulips", ConnectionType::DirectLink, 1.0),
            ("Ferns", ConnectionType::DirectLink, 1.0),
            ("Tulips", ConnectionType::TagSimilarity, 0.5),
            ("Poppies", ConnectionType::TagSimilarity, 2.0 / 3.0),
        ]
    );
    assert!(report.connections.iter().all(|edge| edge.source == "Roses"));
}

#[test]
fn strengths_stay_within_unit_interval() {
    let report = garden()
        .analyze_connections("garden", "Poppies", &ConnectionQuery::default())
        .unwrap();
    assert!(report
        .connections
        .iter()
        .all(|edge| edge.strength > 0.0 && edge.strength <= 1.0));
    assert!(report.connections.iter().all(|edge| edge.target != "Poppies"));
}

#[test]
fn type_filter_and_limit_are_applied() {
    let registry = garden();

    let tags_only = ConnectionQuery {
        types: Some(vec![ConnectionType::TagSimilarity]),
        ..ConnectionQuery::default()
    };
    let report = registry
        .analyze_connections("garden", "Roses", &tags_only)
        .unwrap();
    assert!(report
        .connections
        .iter()
        .all(|edge| edge.connection_type == ConnectionType::TagSimilarity));
    assert_eq!(report.total_connections, 2);

    let capped = ConnectionQuery {
        limit: Some(1),
        ..ConnectionQuery::default()
    };
    let report = registry.analyze_connections("garden", "Roses", &capped).unwrap();
    assert_eq!(report.total_connections, 4);
    assert_eq!(report.connections.len(), 1);
    assert_eq!(report.connections[0].target, "Tulips");
}

#[test]
fn content_similarity_yields_no_edges() {
    let query = ConnectionQuery {
        types: Some(vec![ConnectionType::ContentSimilarity]),
        depth: Some(3),
        ..ConnectionQuery::default()
    };
    let report = garden()
        .analyze_connections("garden", "Roses", &query)
        .unwrap();
    assert_eq!(report.total_connections, 0);
    assert!(report.connections.is_empty());
}

#[test]
fn unknown_project_or_page_is_reported() {
    let registry = garden();

    let err = registry
        .analyze_connections("missing", "Roses", &ConnectionQuery::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::ProjectNotFound(name) if name == "missing"));

    let err = registry
        .analyze_connections("garden", "Lilies", &ConnectionQuery::default())
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::PageNotFound { ref project, ref title } if project == "garden" && title == "Lilies"
    ));
    assert!(err.to_string().contains("Lilies"));
}

#[test]
fn report_serializes_wire_names() {
    let report = garden()
        .analyze_connections("garden", "Ferns", &ConnectionQuery::default())
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["sourcePage"], "Ferns");
    assert_eq!(json["totalConnections"], 0);

    let report = garden()
        .analyze_connections("garden", "Roses", &ConnectionQuery::default())
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["connections"][0]["connectionType"], "direct_link");
    assert_eq!(json["connections"][2]["connectionType"], "tag_similarity");
}

#[test]
fn empty_type_list_yields_no_edges() {
    let query = ConnectionQuery {
        types: Some(Vec::new()),
        ..ConnectionQuery::default()
    };
    let report = garden()
        .analyze_connections("garden", "Roses", &query)
        .unwrap();
    assert_eq!(report.total_connections, 0);
}

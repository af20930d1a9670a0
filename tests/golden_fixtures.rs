use catalog_diff::{CatalogDiffer, DiffOptions, SchemaGeneration};
use serde_json::Value;
use std::path::Path;

fn golden(name: &str) -> Value {
    let text = std::fs::read_to_string(Path::new("tests/fixtures/golden").join(name))
        .expect("failed to read golden file");
    serde_json::from_str(&text).expect("golden file is not JSON")
}

#[test]
fn golden_diff_current_pair() {
    let report = CatalogDiffer::new(
        "tests/fixtures/current/old/web01.json",
        "tests/fixtures/current/new/web01.json",
    )
    .diff()
    .expect("diff should succeed");

    let actual = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(actual, golden("web01.diff.json"));
}

#[test]
fn golden_diff_current_pair_without_classes() {
    let options = DiffOptions::builder()
        .exclude_classes(true)
        .build()
        .expect("valid options");
    let report = CatalogDiffer::new(
        "tests/fixtures/current/old/web01.json",
        "tests/fixtures/current/new/web01.json",
    )
    .with_options(options)
    .diff()
    .expect("diff should succeed");

    // Two Class resources drop out of each side
    assert_eq!(report.total_resources_in_old, 3);
    assert_eq!(report.total_resources_in_new, 3);
    assert_eq!(report.catalog_percentage_changed, "33.33");
    assert_eq!(report.node_differences, 3);
}

#[test]
fn golden_diff_legacy_pair_versions() {
    let report = CatalogDiffer::new("tests/fixtures/legacy/old.yaml", "tests/fixtures/legacy/new.yaml")
        .with_schema(SchemaGeneration::Legacy)
        .diff()
        .expect("legacy diff should succeed");

    assert_eq!(report.old_version.as_deref(), Some("1234"));
    assert_eq!(report.new_version.as_deref(), Some("1240"));
    assert_eq!(
        report.params_in_old["File[/etc/motd]"],
        vec!["content".to_string()]
    );
}

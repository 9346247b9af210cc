//! # Layerdocs Integration Tests
//!
//! End-to-end tests driving the publisher against a scratch README and
//! registry files.
//!
//! ## Coverage
//!
//! | Behaviour | Test |
//! |-----------|------|
//! | Release into empty registry | `test_publish_into_empty_registry` |
//! | Compatibility row cells | `test_publish_into_empty_registry` |
//! | Semantic version order | `test_compatibility_semantic_order` |
//! | Numeric generation order | `test_mappings_numeric_order` |
//! | Missing marker aborts | `test_missing_marker_leaves_everything_untouched` |
//! | Idempotence | `test_sync_twice_is_noop` |
//! | Latest ARN tables | `test_latest_tables_follow_newest_generation` |

use layerdocs_core::{Architecture, LayerDocsConfig, LayerDocsError, Publisher};
use std::fs;
use tempfile::TempDir;

const README: &str = "# DuckDB Lambda Layers

Prebuilt layers for AWS Lambda.

## Layer versions

<!-- MAPPINGS-LIST:START -->
<!-- MAPPINGS-LIST:END -->

## Compatibility

<!-- COMPATIBILITY-LIST:START -->
<!-- COMPATIBILITY-LIST:END -->

## Latest layers

### x86_64

<!-- LATEST-x86_64:START -->
<!-- LATEST-x86_64:END -->

### arm64

<!-- LATEST-arm64:START -->
<!-- LATEST-arm64:END -->

## License

MIT
";

/// Creates a configuration rooted in `temp_dir` with a README in place.
fn test_config(temp_dir: &TempDir) -> LayerDocsConfig {
    fs::write(temp_dir.path().join("README.md"), README).unwrap();

    let mut config = LayerDocsConfig::default();
    config.paths.arns_file = temp_dir.path().join("data/arns.json");
    config.paths.generations_file = temp_dir.path().join("data/layer-versions.json");
    config.paths.document = temp_dir.path().join("README.md");
    config.deployment.account_id = Some("111111111111".to_string());
    config.deployment.regions = vec!["us-east-1".to_string(), "eu-west-1".to_string()];
    config
}

fn readme(temp_dir: &TempDir) -> String {
    fs::read_to_string(temp_dir.path().join("README.md")).unwrap()
}

/// Lines strictly between the markers of `name`.
fn section(document: &str, name: &str) -> Vec<String> {
    let start = format!("<!-- {name}:START -->");
    let end = format!("<!-- {name}:END -->");
    document
        .lines()
        .skip_while(|line| *line != start)
        .skip(1)
        .take_while(|line| *line != end)
        .map(str::to_string)
        .collect()
}

// =============================================================================
// PUBLISH TESTS
// =============================================================================

#[test]
fn test_publish_into_empty_registry() {
    let temp_dir = TempDir::new().unwrap();
    let publisher = Publisher::new(test_config(&temp_dir)).unwrap();

    let report = publisher
        .publish(&publisher.release("1.2.0", 5, ["3.11"]))
        .unwrap();

    // 1 interpreter x 2 architectures x 2 regions
    assert_eq!(report.identifiers_recorded, 4);
    assert!(report.document.written);

    let document = readme(&temp_dir);
    assert_eq!(
        section(&document, "MAPPINGS-LIST"),
        vec![
            "| Layer version | DuckDB version |",
            "| ------------- | -------------- |",
            "| 5 | v1.2.0 |",
        ]
    );
    assert_eq!(
        section(&document, "COMPATIBILITY-LIST"),
        vec![
            "| DuckDB version | Python versions | Architectures |",
            "| -------------- | --------------- | ------------- |",
            "| 1.2.0 | 3.11 | arm64, x86_64 |",
        ]
    );
    assert_eq!(
        section(&document, "LATEST-arm64"),
        vec![
            "| Region | Layer ARN |",
            "| ------ | --------- |",
            "| us-east-1 | arn:aws:lambda:us-east-1:111111111111:layer:duckdb-python-arm64:5 |",
            "| eu-west-1 | arn:aws:lambda:eu-west-1:111111111111:layer:duckdb-python-arm64:5 |",
        ]
    );

    // Prose outside the anchors survives
    assert!(document.starts_with("# DuckDB Lambda Layers\n\nPrebuilt layers for AWS Lambda.\n"));
    assert!(document.ends_with("<!-- LATEST-arm64:END -->\n\n## License\n\nMIT\n"));

    let arns = fs::read_to_string(temp_dir.path().join("data/arns.json")).unwrap();
    assert!(arns.contains(
        "\"eu-west-1\": \"arn:aws:lambda:eu-west-1:111111111111:layer:duckdb-python311-x86_64:5\""
    ));
}

#[test]
fn test_compatibility_semantic_order() {
    let temp_dir = TempDir::new().unwrap();
    let publisher = Publisher::new(test_config(&temp_dir)).unwrap();

    for (version, generation) in [("1.10.0", 12), ("1.2.0", 5), ("1.9.0", 9)] {
        publisher
            .publish(&publisher.release(version, generation, ["3.12"]))
            .unwrap();
    }

    let rows: Vec<String> = section(&readme(&temp_dir), "COMPATIBILITY-LIST")
        .into_iter()
        .skip(2)
        .collect();
    assert_eq!(
        rows,
        vec![
            "| 1.2.0 | 3.12 | arm64, x86_64 |",
            "| 1.9.0 | 3.12 | arm64, x86_64 |",
            "| 1.10.0 | 3.12 | arm64, x86_64 |",
        ]
    );
}

#[test]
fn test_mappings_numeric_order() {
    let temp_dir = TempDir::new().unwrap();
    let publisher = Publisher::new(test_config(&temp_dir)).unwrap();

    publisher.record(&publisher.release("1.1.0", 10, ["3.11"])).unwrap();
    publisher.record(&publisher.release("1.0.0", 9, ["3.11"])).unwrap();
    publisher.sync_document().unwrap();

    let rows: Vec<String> = section(&readme(&temp_dir), "MAPPINGS-LIST")
        .into_iter()
        .skip(2)
        .collect();
    assert_eq!(rows, vec!["| 9 | v1.0.0 |", "| 10 | v1.1.0 |"]);
}

#[test]
fn test_latest_tables_follow_newest_generation() {
    let temp_dir = TempDir::new().unwrap();
    let publisher = Publisher::new(test_config(&temp_dir)).unwrap();

    publisher.publish(&publisher.release("1.1.0", 9, ["3.11"])).unwrap();
    publisher.publish(&publisher.release("1.2.0", 10, ["3.11"])).unwrap();

    let document = readme(&temp_dir);
    let x86 = section(&document, "LATEST-x86_64");
    assert_eq!(
        x86[2],
        "| us-east-1 | arn:aws:lambda:us-east-1:111111111111:layer:duckdb-python-x86_64:10 |"
    );

    let (version, record) = publisher.latest().unwrap();
    assert_eq!(version, "1.2.0");
    assert_eq!(record.generation, 10);
}

// =============================================================================
// FAILURE TESTS
// =============================================================================

#[test]
fn test_missing_marker_leaves_everything_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    let broken = README.replace("<!-- LATEST-arm64:END -->\n", "");
    fs::write(&config.paths.document, &broken).unwrap();

    let publisher = Publisher::new(config).unwrap();
    let err = publisher
        .publish(&publisher.release("1.2.0", 5, ["3.11"]))
        .unwrap_err();

    assert!(err.to_string().contains("<!-- LATEST-arm64:END -->"));
    assert_eq!(readme(&temp_dir), broken);
    assert!(!temp_dir.path().join("data/arns.json").exists());
    assert!(!temp_dir.path().join("data/layer-versions.json").exists());
}

#[test]
fn test_missing_regions_reported() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.deployment.regions.clear();

    let publisher = Publisher::new(config).unwrap();
    let err = publisher
        .publish(&publisher.release("1.2.0", 5, ["3.11"]))
        .unwrap_err();

    assert!(matches!(err, LayerDocsError::MissingConfiguration(_)));
    assert_eq!(readme(&temp_dir), README);
}

// =============================================================================
// IDEMPOTENCE TESTS
// =============================================================================

#[test]
fn test_sync_twice_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let publisher = Publisher::new(test_config(&temp_dir)).unwrap();

    publisher.publish(&publisher.release("1.2.0", 5, ["3.10", "3.11"])).unwrap();
    let first = readme(&temp_dir);

    let report = publisher.sync_document().unwrap();
    assert!(!report.written);
    assert_eq!(readme(&temp_dir), first);
}

#[test]
fn test_single_architecture_layout() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.layer.architectures = vec![Architecture::X86_64];
    let publisher = Publisher::new(config).unwrap();

    publisher.publish(&publisher.release("1.2.0", 5, ["3.11"])).unwrap();

    let document = readme(&temp_dir);
    assert_eq!(section(&document, "COMPATIBILITY-LIST")[2], "| 1.2.0 | 3.11 | x86_64 |");
    // arm64 section is not managed and keeps its original (empty) content
    assert!(section(&document, "LATEST-arm64").is_empty());
}

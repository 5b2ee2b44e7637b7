//! Error handling tests for the processor

use super::{months, release_text, test_config, write_release};
use crate::config::{OutputConfig, OverwriteMode};
use crate::error::MrtsError;
use crate::models::{Category, SourceFile};
use crate::processor::{SalesProcessor, assemble, process_source, transform_sources};
use crate::transform::ValidationRules;
use tempfile::TempDir;

#[tokio::test]
async fn test_unusable_files_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let raw = temp_dir.path().join("raw");
    let curated = temp_dir.path().join("curated");
    write_release(
        &raw,
        "retail_total.csv",
        &release_text("Retail Trade", &[(2021, months(500_000.0, 1_000.0))]),
    );
    write_release(&raw, "motor_vehicle.csv", "");
    write_release(
        &raw,
        "food_and_beverage.csv",
        "FOOD AND BEVERAGE STORES\nYEAR JAN FEB MAR\nNo estimates published.\n",
    );
    write_release(&raw, "readme.txt", "Files in this directory come from the census site.");

    let processor = SalesProcessor::new(test_config(&raw, &curated)).unwrap();
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.files_discovered, 3);
    assert_eq!(stats.files_processed, 1);
    // empty file, header-only file and the unrecognised readme
    assert_eq!(stats.files_skipped, 3);
    assert_eq!(stats.facts_written, 12);
}

#[tokio::test]
async fn test_missing_input_fails_job() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir.path().join("absent"), &temp_dir.path().join("curated"));

    let result = SalesProcessor::new(config).unwrap().process().await;

    assert!(matches!(result, Err(MrtsError::InputNotFound { .. })));
}

#[tokio::test]
async fn test_empty_input_is_success_with_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let raw = temp_dir.path().join("raw");
    std::fs::create_dir_all(&raw).unwrap();
    let curated = temp_dir.path().join("curated");

    let stats = SalesProcessor::new(test_config(&raw, &curated))
        .unwrap()
        .process()
        .await
        .unwrap();

    assert_eq!(stats.files_discovered, 0);
    assert_eq!(stats.facts_written, 0);
    assert!(!curated.exists());
}

#[tokio::test]
async fn test_nothing_valid_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let raw = temp_dir.path().join("raw");
    let curated = temp_dir.path().join("curated");
    write_release(
        &raw,
        "retail_total.csv",
        &release_text("Retail Trade", &[(1985, months(100_000.0, 1_000.0))]),
    );

    let stats = SalesProcessor::new(test_config(&raw, &curated))
        .unwrap()
        .process()
        .await
        .unwrap();

    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.file_reports[0].filter.year_out_of_range, 12);
    assert_eq!(stats.partitions_written, 0);
    assert!(!curated.exists());
}

#[test]
fn test_invalid_configuration_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path(), temp_dir.path()).with_workers(0);

    assert!(matches!(
        SalesProcessor::new(config),
        Err(MrtsError::Configuration { .. })
    ));
}

#[test]
fn test_empty_source_is_recoverable() {
    let source = SourceFile::new("retail_total.csv", Category::RetailTotal, "   \n\n");

    let error = process_source(&source, &ValidationRules::default()).unwrap_err();

    assert!(error.is_recoverable());
}

#[test]
fn test_structural_error_aborts() {
    let good = SourceFile::new(
        "a.csv",
        Category::RetailTotal,
        release_text("Retail Trade", &[(2021, months(500_000.0, 1_000.0))]),
    );
    let mut results = vec![process_source(&good, &ValidationRules::default())];
    results.push(Err(MrtsError::invariant("row parser", "expected 13 fields, got 5")));

    let result = assemble(results);

    assert!(matches!(result, Err(MrtsError::InvariantViolation { .. })));
}

#[test]
fn test_skipped_sources_do_not_change_result() {
    let good = SourceFile::new(
        "a.csv",
        Category::RetailTotal,
        release_text("Retail Trade", &[(2021, months(500_000.0, 1_000.0))]),
    );
    let empty = SourceFile::new("b.csv", Category::RetailTotal, "");
    let rules = ValidationRules::default();

    let alone = transform_sources(std::slice::from_ref(&good), &rules).unwrap();
    let with_empty = transform_sources(&[good, empty], &rules).unwrap();

    assert_eq!(with_empty.partitions, alone.partitions);
    assert_eq!(with_empty.files_skipped, 1);
}

#[test]
fn test_overwrite_all_cannot_clear_raw_input() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    let raw = data.join("raw");
    let release = write_release(
        &raw,
        "retail_total.csv",
        &release_text("Retail Trade", &[(2021, months(500_000.0, 1_000.0))]),
    );

    let config = test_config(&raw, &data).with_output(OutputConfig {
        overwrite: OverwriteMode::All,
        ..OutputConfig::default()
    });

    let result = SalesProcessor::new(config);
    assert!(matches!(result, Err(MrtsError::Configuration { .. })));
    assert!(release.exists());
}

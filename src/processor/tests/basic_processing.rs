//! Basic processing integration tests

use super::{months, release_text, test_config, write_release};
use crate::config::CatalogConfig;
use crate::models::{Category, SourceFile};
use crate::processor::writer::list_partition_files;
use crate::processor::{SalesProcessor, transform_sources};
use crate::transform::ValidationRules;
use polars::prelude::{DataFrame, ParquetReader, SerReader};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn read_partition(path: &Path) -> DataFrame {
    ParquetReader::new(fs::File::open(path).unwrap()).finish().unwrap()
}

fn sales_column(df: &DataFrame) -> Vec<f64> {
    df.column("sales").unwrap().f64().unwrap().into_iter().flatten().collect()
}

#[tokio::test]
async fn test_basic_processing_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let raw = temp_dir.path().join("raw");
    let curated = temp_dir.path().join("curated");
    write_release(
        &raw,
        "retail_total.csv",
        &release_text("Retail Trade (44000)", &[(2021, months(500_000.0, 1_000.0))]),
    );

    let processor = SalesProcessor::new(test_config(&raw, &curated)).unwrap();
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.files_discovered, 1);
    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.files_skipped, 0);
    assert_eq!(stats.facts_written, 12);
    assert_eq!(stats.partitions_written, 12);
    assert_eq!(stats.output_path, curated);

    // The seasonal factor row is dropped by the sales bound
    let report = &stats.file_reports[0];
    assert_eq!(report.parse.rows_parsed, 2);
    assert_eq!(report.filter.accepted, 12);
    assert_eq!(report.filter.sales_out_of_range, 12);

    let files = list_partition_files(&curated).unwrap();
    assert_eq!(files.len(), 12);

    let march = read_partition(&curated.join("year=2021/month=3/part-00000.parquet"));
    assert_eq!(march.height(), 1);
    assert_eq!(sales_column(&march), vec![502_000.0]);
    let dates: Vec<_> = march
        .column("date")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(dates, vec!["2021-03-01"]);
}

#[tokio::test]
async fn test_overlapping_ingests_later_source_wins() {
    let temp_dir = TempDir::new().unwrap();
    let raw = temp_dir.path().join("raw");
    let curated = temp_dir.path().join("curated");

    let mut revised = months(600_000.0, 1_000.0);
    revised[2] = 615_500.0;
    write_release(
        &raw.join("ingest_date=2024-01-15"),
        "retail_total.csv",
        &release_text("Retail Trade", &[(2021, months(600_000.0, 5_000.0))]),
    );
    write_release(
        &raw.join("ingest_date=2024-02-15"),
        "adv44000.txt",
        &release_text("Retail Trade", &[(2021, revised)]),
    );

    let processor = SalesProcessor::new(test_config(&raw, &curated)).unwrap();
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.merge.input, 24);
    assert_eq!(stats.merge.output, 12);
    assert_eq!(stats.merge.duplicates_resolved, 12);

    let march = read_partition(&curated.join("year=2021/month=3/part-00000.parquet"));
    assert_eq!(sales_column(&march), vec![615_500.0]);
}

#[tokio::test]
async fn test_categories_share_partitions() {
    let temp_dir = TempDir::new().unwrap();
    let raw = temp_dir.path().join("raw");
    let curated = temp_dir.path().join("curated");
    write_release(
        &raw,
        "retail_total.csv",
        &release_text("Retail Trade", &[(2022, months(610_000.0, 1_000.0))]),
    );
    write_release(
        &raw,
        "food_and_beverage.csv",
        &release_text("Food and Beverage Stores", &[(2022, months(80_000.0, 100.0))]),
    );

    let processor = SalesProcessor::new(test_config(&raw, &curated)).unwrap();
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.partitions_written, 12);
    assert_eq!(stats.facts_written, 24);

    let january = read_partition(&curated.join("year=2022/month=1/part-00000.parquet"));
    let categories: Vec<_> = january
        .column("category")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(categories, vec!["food_and_beverage", "retail_total"]);
    assert_eq!(sales_column(&january), vec![80_000.0, 610_000.0]);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let raw = temp_dir.path().join("raw");
    let curated = temp_dir.path().join("curated");
    write_release(
        &raw,
        "motor_vehicle.csv",
        &release_text("Motor Vehicle and Parts Dealers", &[(2020, months(100_000.0, 500.0))]),
    );

    let config = test_config(&raw, &curated).with_dry_run();
    let stats = SalesProcessor::new(config).unwrap().process().await.unwrap();

    assert_eq!(stats.merge.output, 12);
    assert_eq!(stats.facts_written, 0);
    assert_eq!(stats.partitions_written, 0);
    assert!(!curated.exists());
}

#[tokio::test]
async fn test_catalog_ddl_written_with_partitions() {
    let temp_dir = TempDir::new().unwrap();
    let raw = temp_dir.path().join("raw");
    let curated = temp_dir.path().join("curated");
    write_release(
        &raw,
        "retail_and_food_services.csv",
        &release_text("Retail and Food Services", &[(2023, months(700_000.0, 1_000.0))]),
    );

    let config = test_config(&raw, &curated).with_catalog(CatalogConfig::default());
    SalesProcessor::new(config).unwrap().process().await.unwrap();

    let ddl = fs::read_to_string(curated.join("_table.sql")).unwrap();
    assert!(ddl.contains("CREATE DATABASE IF NOT EXISTS mrts_retail_sales;"));
    assert!(ddl.contains(&format!("LOCATION '{}'", curated.display())));
}

#[test]
fn test_transform_sources_without_io() {
    let sources = vec![
        SourceFile::new(
            "b.csv",
            Category::RetailTotal,
            release_text("Retail Trade", &[(2021, months(600_000.0, 0.0))]),
        ),
        SourceFile::new(
            "a.csv",
            Category::RetailTotal,
            release_text("Retail Trade", &[(2021, months(590_000.0, 0.0))]),
        ),
    ];

    let output = transform_sources(&sources, &ValidationRules::default()).unwrap();

    assert_eq!(output.partitions.len(), 12);
    assert_eq!(output.fact_count(), 12);
    assert_eq!(output.merge.duplicates_resolved, 12);
    assert!(output.partitions.iter().all(|p| p.rows[0].sales == 600_000.0));
    let ids: Vec<_> = output.reports.iter().map(|r| r.source_id.as_str()).collect();
    assert_eq!(ids, vec!["a.csv", "b.csv"]);
}

#[tokio::test]
async fn test_file_reports_count_rejections_per_file() {
    let temp_dir = TempDir::new().unwrap();
    let raw = temp_dir.path().join("raw");
    let curated = temp_dir.path().join("curated");

    // Suppressed estimates are published as (S)
    let mut text = release_text("Retail Trade", &[(2021, months(600_000.0, 1_000.0))]);
    text.push_str(
        "2022   (S)   611000   612000   613000   614000   615000   616000   617000   618000   619000   620000   (S)\n",
    );
    write_release(&raw, "retail_total.csv", &text);
    write_release(
        &raw,
        "motor_vehicle.csv",
        &release_text("Motor Vehicle and Parts Dealers", &[(2021, months(120_000.0, 100.0))]),
    );

    let stats = SalesProcessor::new(test_config(&raw, &curated))
        .unwrap()
        .process()
        .await
        .unwrap();

    let ids: Vec<_> = stats.file_reports.iter().map(|r| r.source_id.as_str()).collect();
    assert_eq!(ids, vec!["motor_vehicle.csv", "retail_total.csv"]);

    let motor = &stats.file_reports[0];
    assert_eq!(motor.filter.accepted, 12);
    assert_eq!(motor.rejected(), 12);

    let retail = &stats.file_reports[1];
    assert_eq!(retail.parse.unparsable_fields, 2);
    assert_eq!(retail.filter.missing_sales, 2);
    assert_eq!(retail.filter.sales_out_of_range, 12);
    assert_eq!(retail.filter.accepted, 22);
    assert_eq!(retail.rejected(), 14);
}

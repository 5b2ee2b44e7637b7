//! Command-line interface for the MRTS processor
//!
//! Defines the clap argument tree, logging setup, and how command-line
//! flags are layered over the configuration file.

use crate::config::{CatalogConfig, CompressionAlgorithm, MrtsConfig, OverwriteMode};
use crate::constants::{DEFAULT_DATABASE_NAME, DEFAULT_TABLE_NAME};
use crate::models::{Category, ProcessingStats};
use crate::processor::SalesProcessor;
use crate::schema::TableSchema;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// CLI arguments for the MRTS retail sales processor
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mrts-processor",
    version,
    about = "Normalize Monthly Retail Trade Sales releases into a partitioned Parquet table",
    long_about = "Reads raw advance monthly retail trade release files, extracts the monthly \
                  sales figures for each category, resolves revisions across releases and \
                  writes one Parquet file per year and month, ready to be registered as a \
                  partitioned table."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process raw release files into the curated table
    Process(ProcessArgs),
    /// Print the catalog DDL for the curated table
    Schema(SchemaArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Raw release root, e.g. raw/retail_sales
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input_path: Option<PathBuf>,

    /// Curated output root receiving year=/month= partitions
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file for advanced settings. If not specified,
    /// looks for ~/.config/mrts-processor/config.toml
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Only read the ingest_date=YYYY-MM-DD directory under the input root
    #[arg(long = "ingest-date", value_name = "YYYY-MM-DD")]
    pub ingest_date: Option<NaiveDate>,

    /// Comma-separated categories to process, e.g. retail_total,motor_vehicle
    #[arg(long = "categories", value_name = "LIST", value_delimiter = ',')]
    pub categories: Option<Vec<Category>>,

    #[arg(long = "min-year", value_name = "YEAR")]
    pub min_year: Option<i32>,

    #[arg(long = "max-year", value_name = "YEAR")]
    pub max_year: Option<i32>,

    /// Exclusive lower sales bound in millions of dollars
    #[arg(long = "min-sales", value_name = "VALUE")]
    pub min_sales: Option<f64>,

    /// Exclusive upper sales bound in millions of dollars
    #[arg(long = "max-sales", value_name = "VALUE")]
    pub max_sales: Option<f64>,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long = "compression", value_name = "ALGORITHM")]
    pub compression: Option<CompressionAlgorithm>,

    /// Replace only written partitions (partition) or the whole output root (all)
    #[arg(long = "overwrite", value_name = "MODE")]
    pub overwrite: Option<OverwriteMode>,

    /// Catalog database for the generated DDL
    #[arg(long = "database", value_name = "NAME")]
    pub database: Option<String>,

    /// Catalog table for the generated DDL
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,

    /// Number of files processed concurrently
    #[arg(short = 'j', long = "workers", value_name = "COUNT")]
    pub workers: Option<usize>,

    /// Show what would be written without creating output files
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show warnings and errors. Overrides verbose settings.
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long = "json-logs")]
    pub json_logs: bool,
}

/// Arguments for the schema command
#[derive(Debug, Clone, Parser)]
pub struct SchemaArgs {
    #[arg(long = "database", value_name = "NAME", default_value = DEFAULT_DATABASE_NAME)]
    pub database: String,

    #[arg(long = "table", value_name = "NAME", default_value = DEFAULT_TABLE_NAME)]
    pub table: String,

    /// Location of the curated root, e.g. s3://bucket/curated/retail_sales/
    #[arg(long = "location", value_name = "URI", default_value = "curated/retail_sales")]
    pub location: String,
}

impl ProcessArgs {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Layer command-line flags over a loaded configuration
    pub fn apply_to(&self, mut config: MrtsConfig) -> MrtsConfig {
        if let Some(path) = &self.input_path {
            config.input_path = path.clone();
        }
        if let Some(path) = &self.output_path {
            config.output_path = path.clone();
        }
        if let Some(date) = self.ingest_date {
            config.ingest_date = Some(date);
        }
        if let Some(categories) = &self.categories {
            config.categories = Some(categories.clone());
        }
        if let Some(min_year) = self.min_year {
            config.validation.min_year = min_year;
        }
        if let Some(max_year) = self.max_year {
            config.validation.max_year = max_year;
        }
        if let Some(min_sales) = self.min_sales {
            config.validation.min_sales = min_sales;
        }
        if let Some(max_sales) = self.max_sales {
            config.validation.max_sales = max_sales;
        }
        if let Some(compression) = self.compression {
            config.output.compression = compression;
        }
        if let Some(overwrite) = self.overwrite {
            config.output.overwrite = overwrite;
        }
        if self.database.is_some() || self.table.is_some() {
            let mut catalog = config.catalog.take().unwrap_or_default();
            if let Some(database) = &self.database {
                catalog.database = database.clone();
            }
            if let Some(table) = &self.table {
                catalog.table = table.clone();
            }
            config.catalog = Some(catalog);
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.quiet || self.json_logs {
            config.show_progress = false;
        }
        config
    }
}

/// Set up structured logging to stderr
pub fn setup_logging(args: &ProcessArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mrts_processor={}", log_level)));

    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Defaults, then the configuration file, then command-line flags
pub fn load_configuration(args: &ProcessArgs) -> Result<MrtsConfig> {
    let base = match &args.config_file {
        Some(path) => MrtsConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => match MrtsConfig::default_config_path().filter(|path| path.is_file()) {
            Some(path) => MrtsConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => MrtsConfig::default(),
        },
    };

    let config = args.apply_to(base);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run the selected command
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Process(process_args) => {
            setup_logging(&process_args)?;
            let config = load_configuration(&process_args)?;
            let processor = SalesProcessor::new(config)?;
            let stats: ProcessingStats = processor.process().await?;
            debug!(
                "Job finished: {} files, {} facts, {} partitions",
                stats.files_processed, stats.facts_written, stats.partitions_written
            );
            Ok(())
        }
        Commands::Schema(schema_args) => {
            let catalog = CatalogConfig {
                database: schema_args.database,
                table: schema_args.table,
            };
            let table = TableSchema::new(&catalog, schema_args.location);
            print!("{}", table.ddl());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> ProcessArgs {
        match Args::parse_from(argv).command {
            Commands::Process(args) => args,
            other => panic!("expected process command, got {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_configuration() {
        let args = parse(&[
            "mrts-processor",
            "process",
            "--input",
            "/raw",
            "--ingest-date",
            "2024-02-15",
            "--categories",
            "retail_total,motor_vehicle",
            "--min-sales",
            "500",
            "--compression",
            "zstd",
            "--overwrite",
            "all",
            "--table",
            "sales",
            "-j",
            "3",
            "--dry-run",
            "-q",
        ]);

        let config = args.apply_to(MrtsConfig::default());

        assert_eq!(config.input_path, PathBuf::from("/raw"));
        assert_eq!(config.ingest_date, NaiveDate::from_ymd_opt(2024, 2, 15));
        assert_eq!(
            config.categories,
            Some(vec![Category::RetailTotal, Category::MotorVehicle])
        );
        assert_eq!(config.validation.min_sales, 500.0);
        assert_eq!(config.validation.max_year, 2030);
        assert_eq!(config.output.compression, CompressionAlgorithm::Zstd);
        assert_eq!(config.output.overwrite, OverwriteMode::All);
        let catalog = config.catalog.unwrap();
        assert_eq!(catalog.database, DEFAULT_DATABASE_NAME);
        assert_eq!(catalog.table, "sales");
        assert_eq!(config.workers, 3);
        assert!(config.dry_run);
        assert!(!config.show_progress);
        assert_eq!(args.get_log_level(), "warn");
    }

    #[test]
    fn test_defaults_leave_configuration_untouched() {
        let args = parse(&["mrts-processor", "process"]);
        let base = MrtsConfig::default().with_workers(5);

        let config = args.apply_to(base);

        assert_eq!(config.workers, 5);
        assert!(config.catalog.is_none());
        assert!(config.show_progress);
        assert_eq!(args.get_log_level(), "info");
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result =
            Args::try_parse_from(["mrts-processor", "process", "--categories", "groceries"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_command_defaults() {
        match Args::parse_from(["mrts-processor", "schema"]).command {
            Commands::Schema(args) => {
                assert_eq!(args.database, DEFAULT_DATABASE_NAME);
                assert_eq!(args.table, DEFAULT_TABLE_NAME);
            }
            other => panic!("expected schema command, got {:?}", other),
        }
    }
}

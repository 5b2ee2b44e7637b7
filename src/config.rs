//! Configuration management and validation.
//!
//! [`MrtsConfig`] carries everything a processing job needs: where the raw
//! release files live, how they map to categories, the validation bounds,
//! and how the curated partitions are written. It is built from defaults,
//! an optional TOML file, and command-line overrides, in that order.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DATABASE_NAME, DEFAULT_TABLE_NAME,
    INGEST_DATE_DIR_PREFIX,
};
use crate::error::{MrtsError, Result};
use crate::models::Category;
use crate::transform::ValidationRules;
use chrono::NaiveDate;
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = MrtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snappy" => Ok(Self::Snappy),
            "zstd" => Ok(Self::Zstd),
            "lz4" => Ok(Self::Lz4),
            "none" | "uncompressed" => Ok(Self::Uncompressed),
            other => Err(MrtsError::configuration(format!(
                "Unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                other
            ))),
        }
    }
}

/// What to clear before writing partitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteMode {
    /// Replace only the partitions produced by this run
    #[default]
    Partition,
    /// Remove everything under the output root first
    All,
}

impl FromStr for OverwriteMode {
    type Err = MrtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "partition" => Ok(Self::Partition),
            "all" => Ok(Self::All),
            other => Err(MrtsError::configuration(format!(
                "Unknown overwrite mode '{}' (expected partition or all)",
                other
            ))),
        }
    }
}

/// Parquet output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub compression: CompressionAlgorithm,

    /// Enable column statistics for query pruning
    pub statistics: bool,

    pub overwrite: OverwriteMode,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            compression: CompressionAlgorithm::Snappy,
            statistics: true,
            overwrite: OverwriteMode::Partition,
        }
    }
}

/// Catalog database and table the curated output is registered under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub database: String,
    pub table: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE_NAME.to_string(),
            table: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

/// Explicit mapping of files to a category.
///
/// `pattern` is a glob relative to the ingest directory, e.g. `adv44000*.txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub pattern: String,
    pub category: Category,
}

/// Global configuration for MRTS processing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MrtsConfig {
    /// Raw release root
    pub input_path: PathBuf,

    /// Selects the `ingest_date=YYYY-MM-DD` directory under the raw root
    pub ingest_date: Option<NaiveDate>,

    /// Curated root receiving the partitions
    pub output_path: PathBuf,

    /// Explicit file mappings; empty means scan and infer from file names
    pub sources: Vec<SourceSpec>,

    /// Only these categories are processed when set
    pub categories: Option<Vec<Category>>,

    pub validation: ValidationRules,

    pub output: OutputConfig,

    /// Write registration DDL next to the partitions when set
    pub catalog: Option<CatalogConfig>,

    /// Number of source files processed concurrently
    pub workers: usize,

    pub show_progress: bool,

    /// Parse and merge but write nothing
    pub dry_run: bool,
}

impl Default for MrtsConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("raw/retail_sales"),
            ingest_date: None,
            output_path: PathBuf::from("curated/retail_sales"),
            sources: Vec::new(),
            categories: None,
            validation: ValidationRules::default(),
            output: OutputConfig::default(),
            catalog: None,
            workers: num_cpus::get(),
            show_progress: true,
            dry_run: false,
        }
    }
}

impl MrtsConfig {
    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_ingest_date(mut self, date: NaiveDate) -> Self {
        self.ingest_date = Some(date);
        self
    }

    pub fn with_sources(mut self, sources: Vec<SourceSpec>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn with_validation(mut self, rules: ValidationRules) -> Self {
        self.validation = rules;
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn with_catalog(mut self, catalog: CatalogConfig) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Load a configuration file; keys missing from the file keep their defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Per-user configuration file, e.g. `~/.config/mrts-processor/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Directory actually scanned for release files
    pub fn ingest_dir(&self) -> PathBuf {
        match self.ingest_date {
            Some(date) => self.input_path.join(format!(
                "{}{}",
                INGEST_DATE_DIR_PREFIX,
                date.format("%Y-%m-%d")
            )),
            None => self.input_path.clone(),
        }
    }

    pub fn allows_category(&self, category: Category) -> bool {
        self.categories
            .as_ref()
            .is_none_or(|allowed| allowed.contains(&category))
    }

    /// True when the input root is the output root or lies beneath it
    fn output_contains_input(&self) -> bool {
        if self.input_path.starts_with(&self.output_path) {
            return true;
        }
        match (self.input_path.canonicalize(), self.output_path.canonicalize()) {
            (Ok(input), Ok(output)) => input.starts_with(output),
            _ => false,
        }
    }

    /// Check the settings are consistent before a job starts
    pub fn validate(&self) -> Result<()> {
        let rules = &self.validation;

        if rules.min_year > rules.max_year {
            return Err(MrtsError::configuration(format!(
                "min_year {} is after max_year {}",
                rules.min_year, rules.max_year
            )));
        }

        if !(rules.min_sales < rules.max_sales) {
            return Err(MrtsError::configuration(format!(
                "min_sales {} must be below max_sales {}",
                rules.min_sales, rules.max_sales
            )));
        }

        if self.workers == 0 {
            return Err(MrtsError::configuration("workers must be at least 1"));
        }

        if self.input_path.as_os_str().is_empty() {
            return Err(MrtsError::configuration("input path is empty"));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(MrtsError::configuration("output path is empty"));
        }

        if self.output.overwrite == OverwriteMode::All && self.output_contains_input() {
            return Err(MrtsError::configuration(format!(
                "overwrite = all would clear {} which holds the input {}",
                self.output_path.display(),
                self.input_path.display()
            )));
        }

        if let Some(categories) = &self.categories
            && categories.is_empty()
        {
            return Err(MrtsError::configuration("category allow-list is empty"));
        }

        if let Some(catalog) = &self.catalog
            && (catalog.database.trim().is_empty() || catalog.table.trim().is_empty())
        {
            return Err(MrtsError::configuration(
                "catalog database and table must both be named",
            ));
        }

        for spec in &self.sources {
            glob::Pattern::new(&spec.pattern).map_err(|e| {
                MrtsError::configuration(format!(
                    "Invalid source pattern '{}': {}",
                    spec.pattern, e
                ))
            })?;
        }

        Ok(())
    }
}

//! Parquet writing module for the curated table
//!
//! Writes one Parquet file per (year, month) partition into a Hive-style
//! directory tree and, when a catalog is configured, the DDL that registers
//! the tree as a table. All operations here are blocking; the processor runs
//! them on the blocking pool.

use crate::config::{OutputConfig, OverwriteMode};
use crate::constants::{PARTITION_FILE_NAME, TABLE_DDL_FILE_NAME, columns};
use crate::error::{MrtsError, Result};
use crate::models::Partition;
use crate::schema::{TableSchema, partition_file_schema};
use polars::prelude::{Column, DataFrame, NamedFrom, ParquetWriter, Schema, StatisticsOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Totals for one write pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSummary {
    pub partitions_written: usize,
    pub rows_written: usize,
    pub files: Vec<PathBuf>,
}

/// Partitioned Parquet writer rooted at the curated output directory
#[derive(Debug)]
pub struct PartitionedParquetWriter {
    output_root: PathBuf,
    output: OutputConfig,
}

impl PartitionedParquetWriter {
    pub fn new(output_root: impl Into<PathBuf>, output: OutputConfig) -> Self {
        Self {
            output_root: output_root.into(),
            output,
        }
    }

    /// Create the output root, clearing it first when overwriting everything
    pub fn prepare(&self) -> Result<()> {
        if self.output.overwrite == OverwriteMode::All && self.output_root.exists() {
            info!("Clearing output root {}", self.output_root.display());
            fs::remove_dir_all(&self.output_root)
                .map_err(|e| self.write_error(&self.output_root, e))?;
        }

        fs::create_dir_all(&self.output_root)
            .map_err(|e| self.write_error(&self.output_root, e))?;
        Ok(())
    }

    /// Replace one partition directory with a fresh data file
    pub fn write_partition(&self, partition: &Partition) -> Result<PathBuf> {
        let dir = self.output_root.join(partition.key.relative_dir());
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| self.write_error(&dir, e))?;
        }
        fs::create_dir_all(&dir).map_err(|e| self.write_error(&dir, e))?;

        let path = dir.join(PARTITION_FILE_NAME);
        let mut df = partition_to_dataframe(partition)?;
        self.write_dataframe(&mut df, &path)?;

        debug!("Wrote {} rows to {}", partition.len(), path.display());
        Ok(path)
    }

    /// Write every partition, in the order given
    pub fn write_all(&self, partitions: &[Partition]) -> Result<WriteSummary> {
        self.prepare()?;

        let mut summary = WriteSummary::default();
        for partition in partitions.iter().filter(|p| !p.is_empty()) {
            let path = self.write_partition(partition)?;
            summary.partitions_written += 1;
            summary.rows_written += partition.len();
            summary.files.push(path);
        }

        info!(
            "Wrote {} partitions ({} rows) under {}",
            summary.partitions_written,
            summary.rows_written,
            self.output_root.display()
        );
        Ok(summary)
    }

    /// Write catalog registration statements next to the partitions
    pub fn write_table_ddl(&self, table: &TableSchema) -> Result<PathBuf> {
        let path = self.output_root.join(TABLE_DDL_FILE_NAME);
        fs::write(&path, table.ddl()).map_err(|e| self.write_error(&path, e))?;
        debug!("Wrote table DDL for {} to {}", table.qualified_name(), path.display());
        Ok(path)
    }

    fn write_dataframe(&self, df: &mut DataFrame, path: &Path) -> Result<()> {
        let file = fs::File::create(path).map_err(|e| self.write_error(path, e))?;
        let statistics = if self.output.statistics {
            StatisticsOptions::full()
        } else {
            StatisticsOptions::empty()
        };

        ParquetWriter::new(file)
            .with_compression(self.output.compression.to_polars_compression())
            .with_statistics(statistics)
            .finish(df)
            .map_err(|e| MrtsError::OutputWrite {
                path: path.to_path_buf(),
                reason: format!("Failed to write parquet: {}", e),
            })?;

        Ok(())
    }

    fn write_error(&self, path: &Path, error: std::io::Error) -> MrtsError {
        MrtsError::OutputWrite {
            path: path.to_path_buf(),
            reason: error.to_string(),
        }
    }
}

/// Build the stored columns of a partition: category, sales, date
pub fn partition_to_dataframe(partition: &Partition) -> Result<DataFrame> {
    let categories: Vec<&str> = partition.rows.iter().map(|r| r.category.as_str()).collect();
    let sales: Vec<f64> = partition.rows.iter().map(|r| r.sales).collect();
    let dates: Vec<&str> = partition.rows.iter().map(|r| r.date.as_str()).collect();

    let df = DataFrame::new(vec![
        Column::new(columns::CATEGORY.into(), categories),
        Column::new(columns::SALES.into(), sales),
        Column::new(columns::DATE.into(), dates),
    ])?;

    let schema: &Schema = &df.schema();
    if *schema != partition_file_schema() {
        return Err(MrtsError::invariant(
            "partition writer",
            format!("partition columns {:?} do not match the table schema", schema),
        ));
    }
    Ok(df)
}

/// All partition data files under an output root, sorted by path
pub fn list_partition_files(output_root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !output_root.exists() {
        return Ok(files);
    }

    for entry in WalkDir::new(output_root).sort_by_file_name() {
        let entry = entry.map_err(|e| MrtsError::Io(e.into()))?;
        if entry.file_type().is_file() && entry.file_name() == PARTITION_FILE_NAME {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

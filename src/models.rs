//! Core data structures and types for MRTS processing.
//!
//! Defines the source categories, the records that flow through the
//! pipeline (raw source, wide row, candidate, fact, partition) and the
//! job-level processing statistics.

use crate::constants::{MONTHS_PER_YEAR, census_codes};
use crate::error::MrtsError;
use crate::parser::ParseStats;
use crate::transform::{FilterStats, MergeStats};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Source categories published in the advance monthly retail release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    RetailAndFoodServices,
    RetailTotal,
    FoodAndBeverage,
    MotorVehicle,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::RetailAndFoodServices,
        Category::RetailTotal,
        Category::FoodAndBeverage,
        Category::MotorVehicle,
    ];

    /// Label stored in the `category` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::RetailAndFoodServices => "retail_and_food_services",
            Category::RetailTotal => "retail_total",
            Category::FoodAndBeverage => "food_and_beverage",
            Category::MotorVehicle => "motor_vehicle",
        }
    }

    /// Census file code of the release file carrying this category
    pub fn census_code(&self) -> &'static str {
        match self {
            Category::RetailAndFoodServices => census_codes::RETAIL_AND_FOOD_SERVICES,
            Category::RetailTotal => census_codes::RETAIL_TOTAL,
            Category::FoodAndBeverage => census_codes::FOOD_AND_BEVERAGE,
            Category::MotorVehicle => census_codes::MOTOR_VEHICLE,
        }
    }

    /// Match a census file code, ignoring case
    pub fn from_census_code(code: &str) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.census_code() == code)
    }

    /// Infer the category from a file stem holding either a label or a census code
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        stem.parse().ok().or_else(|| Self::from_census_code(stem))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MrtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == label)
            .ok_or_else(|| MrtsError::configuration(format!("Unknown category: '{}'", s)))
    }
}

/// One raw release file handed over by the retrieval step
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source_id: String,
    pub category: Category,
    pub content: String,
}

impl SourceFile {
    pub fn new(
        source_id: impl Into<String>,
        category: Category,
        content: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            category,
            content: content.into(),
        }
    }

    /// Decode raw bytes as text, replacing invalid UTF-8 sequences
    pub fn from_bytes(source_id: impl Into<String>, category: Category, bytes: &[u8]) -> Self {
        Self::new(source_id, category, String::from_utf8_lossy(bytes).into_owned())
    }
}

/// A data line after parsing: the year and the twelve month values in calendar order.
///
/// A month value is `None` when its field could not be read as a number.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub year: i32,
    pub month_values: [Option<f64>; MONTHS_PER_YEAR],
}

/// A single (year, month) value before validation
#[derive(Debug, Clone, PartialEq)]
pub struct SalesCandidate {
    pub year: i32,
    pub month: u32,
    pub category: Category,
    pub sales: Option<f64>,
}

/// Uniqueness key of a fact in the curated table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactKey {
    pub year: i32,
    pub month: u32,
    pub category: &'static str,
}

/// The canonical validated record
#[derive(Debug, Clone, PartialEq)]
pub struct SalesFact {
    pub year: i32,
    pub month: u32,
    pub category: Category,
    /// Millions of dollars
    pub sales: f64,
    /// First day of the month
    pub date: NaiveDate,
}

impl SalesFact {
    /// Build a fact, returning `None` when (year, month) is not a calendar month
    pub fn new(year: i32, month: u32, category: Category, sales: f64) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self {
            year,
            month,
            category,
            sales,
            date,
        })
    }

    pub fn key(&self) -> FactKey {
        FactKey {
            year: self.year,
            month: self.month,
            category: self.category.as_str(),
        }
    }

    pub fn partition_key(&self) -> PartitionKey {
        PartitionKey {
            year: self.year,
            month: self.month,
        }
    }

    /// ISO date string stored in the `date` column
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Partition columns of the curated table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PartitionKey {
    pub year: i32,
    pub month: u32,
}

impl PartitionKey {
    /// Hive-style directory of this partition relative to the output root
    pub fn relative_dir(&self) -> PathBuf {
        PathBuf::from(format!("year={}", self.year)).join(format!("month={}", self.month))
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Row payload of a partition; year and month live in the key
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionRow {
    pub category: Category,
    pub sales: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub key: PartitionKey,
    pub rows: Vec<PartitionRow>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Per-file outcome of parsing and validation
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub source_id: String,
    pub category: Category,
    pub parse: ParseStats,
    pub filter: FilterStats,
}

impl FileReport {
    /// Rows and values dropped anywhere between the raw text and the validated facts
    pub fn rejected(&self) -> usize {
        self.parse.rows_rejected + self.filter.rejected()
    }
}

/// Processing statistics
#[derive(Debug, Default, Serialize)]
pub struct ProcessingStats {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub facts_written: usize,
    pub partitions_written: usize,
    pub merge: MergeStats,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
    pub file_reports: Vec<FileReport>,
}

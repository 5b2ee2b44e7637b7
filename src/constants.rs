//! Application constants for the MRTS processor
//!
//! Default validation bounds, release layout facts, census file codes and
//! output naming used throughout the crate.

// =============================================================================
// Release Layout
// =============================================================================

/// Number of month columns in a release row
pub const MONTHS_PER_YEAR: usize = 12;

/// A data line carries the year plus one field per month
pub const MIN_DATA_LINE_FIELDS: usize = MONTHS_PER_YEAR + 1;

/// Number of ASCII digits in the leading year field
pub const YEAR_FIELD_DIGITS: usize = 4;

/// File extensions accepted as raw release files
pub const SOURCE_FILE_EXTENSIONS: &[&str] = &["csv", "txt"];

/// Directory prefix written by the retrieval step for each ingest run
pub const INGEST_DATE_DIR_PREFIX: &str = "ingest_date=";

// =============================================================================
// Validation Defaults
// =============================================================================

/// First year covered by the current release series
pub const DEFAULT_MIN_YEAR: i32 = 1992;

/// Last year accepted before a row is treated as a stray numeric line
pub const DEFAULT_MAX_YEAR: i32 = 2030;

/// Exclusive lower sales bound in millions of dollars.
///
/// Seasonal factor and percentage rows sit well below this value. The bound
/// is an approximation of the release layout, not a documented field.
pub const DEFAULT_MIN_SALES: f64 = 1_000.0;

/// Exclusive upper sales bound in millions of dollars
pub const DEFAULT_MAX_SALES: f64 = 1e7;

// =============================================================================
// Census Source Files
// =============================================================================

/// Census file codes for the advance monthly retail release, keyed to categories
pub mod census_codes {
    pub const RETAIL_AND_FOOD_SERVICES: &str = "adv44x72";
    pub const RETAIL_TOTAL: &str = "adv44000";
    pub const FOOD_AND_BEVERAGE: &str = "adv44500";
    pub const MOTOR_VEHICLE: &str = "adv44100";
}

// =============================================================================
// Output Layout
// =============================================================================

/// Standard column names in the curated table
pub mod columns {
    pub const YEAR: &str = "year";
    pub const MONTH: &str = "month";
    pub const CATEGORY: &str = "category";
    pub const SALES: &str = "sales";
    pub const DATE: &str = "date";
}

/// File name of the single data file written into each partition directory
pub const PARTITION_FILE_NAME: &str = "part-00000.parquet";

/// Catalog DDL written next to the partitions when a catalog is configured
pub const TABLE_DDL_FILE_NAME: &str = "_table.sql";

/// Default catalog table name
pub const DEFAULT_TABLE_NAME: &str = "retail_sales";

/// Default catalog database name
pub const DEFAULT_DATABASE_NAME: &str = "mrts_retail_sales";

/// Configuration file looked up under the user config directory
pub const CONFIG_DIR_NAME: &str = "mrts-processor";
pub const CONFIG_FILE_NAME: &str = "config.toml";

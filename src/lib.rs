//! MRTS Processor Library
//!
//! A Rust library for turning Monthly Retail Trade Sales releases into a
//! clean, queryable table of monthly sales by category.
//!
//! Release files are loosely formatted text: titles, a month header, one row
//! per year with twelve monthly values, and trailing adjustment factors and
//! footnotes. This library provides tools for:
//! - Classifying release lines and parsing year rows into monthly values
//! - Unpivoting rows into one candidate per (year, month, category)
//! - Filtering out-of-range years and non-sales magnitudes
//! - Merging overlapping releases with a deterministic tie-break
//! - Writing one Parquet file per (year, month) partition, plus catalog DDL
//!
//! # Example
//!
//! ```
//! use mrts_processor::models::{Category, SourceFile};
//! use mrts_processor::processor::transform_sources;
//! use mrts_processor::transform::ValidationRules;
//!
//! # fn main() -> mrts_processor::error::Result<()> {
//! let text = "YEAR JAN FEB MAR APR MAY JUN JUL AUG SEP OCT NOV DEC\n\
//!             2021 5000 5100 5200 5300 5400 5500 5600 5700 5800 5900 6000 6100\n";
//! let source = SourceFile::new("retail_total.csv", Category::RetailTotal, text);
//!
//! let output = transform_sources(&[source], &ValidationRules::default())?;
//! assert_eq!(output.partitions.len(), 12);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod processor;
pub mod schema;
pub mod transform;

// Re-export commonly used types
pub use config::MrtsConfig;
pub use error::{MrtsError, Result};
pub use models::{Category, ProcessingStats, SalesFact, SourceFile};
pub use processor::SalesProcessor;

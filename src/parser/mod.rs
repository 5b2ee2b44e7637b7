//! Parser for MRTS release text files
//!
//! Release files are whitespace-aligned tables mixed with titles, column
//! headers, footnotes and blank lines. There is no delimiter between the
//! table and the surrounding prose, so data lines are picked out by shape.
//!
//! ## Architecture
//!
//! - [`classifier`] - decides whether a raw line is a data line or noise
//! - [`row_parser`] - turns a data line into a [`crate::models::WideRow`]
//! - [`source_parser`] - runs both over a whole source file
//! - [`stats`] - per-file parsing statistics
//!
//! ## Usage
//!
//! ```rust
//! use mrts_processor::models::{Category, SourceFile};
//! use mrts_processor::parser::parse_source;
//!
//! # fn example() -> mrts_processor::error::Result<()> {
//! let text = "Estimated Monthly Sales\n\
//!             2021 500000 510000 520000 530000 540000 550000 560000 570000 580000 590000 600000 610000\n";
//! let source = SourceFile::new("adv44000.txt", Category::RetailTotal, text);
//! let result = parse_source(&source)?;
//!
//! assert_eq!(result.rows.len(), 1);
//! assert_eq!(result.stats.noise_lines, 1);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod row_parser;
pub mod source_parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use classifier::{DataLine, LineClass, classify_line};
pub use row_parser::{RowOutcome, RowRejection, parse_data_line, parse_fields, parse_numeric_field};
pub use source_parser::{ParseResult, parse_source, parse_text};
pub use stats::ParseStats;

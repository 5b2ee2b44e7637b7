//! Whole-file parsing for release sources

use super::classifier::{LineClass, classify_line};
use super::row_parser::{RowOutcome, parse_data_line};
use super::stats::ParseStats;
use crate::error::{MrtsError, Result};
use crate::models::{Category, SourceFile, WideRow};
use tracing::{debug, info};

/// Wide rows extracted from one source file
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub source_id: String,
    pub category: Category,
    /// Rows in file order
    pub rows: Vec<WideRow>,
    pub stats: ParseStats,
}

/// Classify and parse every line of a release text.
///
/// Noise lines and rows with an unreadable year are counted and dropped.
/// Only a structural defect in the classifier/parser hand-off is an error.
pub fn parse_text(content: &str) -> Result<(Vec<WideRow>, ParseStats)> {
    let mut stats = ParseStats::new();
    let mut rows = Vec::new();

    for (index, line) in content.lines().enumerate() {
        stats.lines_total += 1;

        let data_line = match classify_line(line, index + 1) {
            LineClass::Data(data_line) => data_line,
            LineClass::Noise => {
                stats.noise_lines += 1;
                continue;
            }
        };
        stats.data_lines += 1;

        match parse_data_line(&data_line)? {
            RowOutcome::Parsed {
                row,
                unparsable_fields,
            } => {
                stats.rows_parsed += 1;
                stats.unparsable_fields += unparsable_fields;
                rows.push(row);
            }
            RowOutcome::Rejected(rejection) => {
                stats.rows_rejected += 1;
                stats
                    .errors
                    .push(format!("Line {}: {}", data_line.line_number(), rejection));
                debug!("Skipped line {}: {}", data_line.line_number(), rejection);
            }
        }
    }

    Ok((rows, stats))
}

/// Parse a source file into wide rows.
///
/// An empty file or a file without a single data line is reported as
/// [`MrtsError::SourceRead`] so the caller can skip it.
pub fn parse_source(source: &SourceFile) -> Result<ParseResult> {
    if source.content.trim().is_empty() {
        return Err(MrtsError::source_read(&source.source_id, "file is empty"));
    }

    let (rows, stats) = parse_text(&source.content)?;

    if stats.data_lines == 0 {
        return Err(MrtsError::source_read(
            &source.source_id,
            format!("no data lines found in {} lines", stats.lines_total),
        ));
    }

    info!(
        "Parsed {}: {} rows from {} data lines ({} noise lines, {} unparsable month values)",
        source.source_id,
        stats.rows_parsed,
        stats.data_lines,
        stats.noise_lines,
        stats.unparsable_fields
    );

    Ok(ParseResult {
        source_id: source.source_id.clone(),
        category: source.category,
        rows,
        stats,
    })
}

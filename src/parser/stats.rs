//! Parsing statistics for release files

use serde::{Deserialize, Serialize};

/// Line and field counts for one source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Lines read from the file
    pub lines_total: usize,

    /// Lines classified as data
    pub data_lines: usize,

    /// Headers, footnotes, blank lines and short lines
    pub noise_lines: usize,

    /// Data lines turned into wide rows
    pub rows_parsed: usize,

    /// Data lines dropped because the year could not be read
    pub rows_rejected: usize,

    /// Month fields left missing because they were not numeric
    pub unparsable_fields: usize,

    /// Row rejection messages for debugging
    pub errors: Vec<String>,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of data lines that became wide rows
    pub fn success_rate(&self) -> f64 {
        if self.data_lines == 0 {
            0.0
        } else {
            (self.rows_parsed as f64 / self.data_lines as f64) * 100.0
        }
    }
}

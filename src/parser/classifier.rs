//! Line classification for release text
//!
//! A line is data when, after collapsing whitespace runs and trimming, it
//! splits into at least thirteen fields and the first field is exactly four
//! ASCII digits. Everything else is noise.
//!
//! This is a shape heuristic. A footnote that happens to start with four
//! digits and carries enough fields is classified as data; the year range
//! check during validation removes most of those.

use crate::constants::{MIN_DATA_LINE_FIELDS, YEAR_FIELD_DIGITS};
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\s)+").expect("Invalid whitespace regex"));

static YEAR_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^[0-9]{{{}}}$", YEAR_FIELD_DIGITS)).expect("Invalid year regex")
});

/// Outcome of classifying one raw line
#[derive(Debug, Clone, PartialEq)]
pub enum LineClass<'a> {
    Data(DataLine<'a>),
    Noise,
}

impl LineClass<'_> {
    pub fn is_data(&self) -> bool {
        matches!(self, LineClass::Data(_))
    }
}

/// A line that passed classification.
///
/// Only [`classify_line`] constructs this type, so holding one guarantees at
/// least thirteen fields with a four-digit first field.
#[derive(Debug, Clone, PartialEq)]
pub struct DataLine<'a> {
    line_number: usize,
    fields: Vec<&'a str>,
}

impl<'a> DataLine<'a> {
    /// 1-based line number in the source file
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }

    pub fn year_field(&self) -> &'a str {
        self.fields[0]
    }
}

/// Split a raw line on whitespace runs, ignoring leading and trailing whitespace
pub fn split_fields(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    WHITESPACE_RUN.split(trimmed).collect()
}

/// Check whether a field is exactly four ASCII digits
pub fn is_year_field(field: &str) -> bool {
    YEAR_FIELD.is_match(field)
}

/// Classify a raw line; `line_number` is carried for diagnostics only
pub fn classify_line(line: &str, line_number: usize) -> LineClass<'_> {
    let fields = split_fields(line);

    if fields.len() < MIN_DATA_LINE_FIELDS || !is_year_field(fields[0]) {
        return LineClass::Noise;
    }

    LineClass::Data(DataLine {
        line_number,
        fields,
    })
}

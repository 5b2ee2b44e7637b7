//! Data line to wide row conversion
//!
//! Field 0 is the year and fields 1 to 12 are the month values in calendar
//! order. Month position is the only thing that assigns a month; column
//! labels in the release header are never consulted. Fields past the twelfth
//! month (annual totals in some releases) are ignored.

use super::classifier::DataLine;
use crate::constants::{MIN_DATA_LINE_FIELDS, MONTHS_PER_YEAR};
use crate::error::{MrtsError, Result};
use crate::models::WideRow;
use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use tracing::debug;

/// Why a data line did not produce a wide row
#[derive(Debug, Clone, PartialEq)]
pub enum RowRejection {
    InvalidYear { value: String, reason: String },
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::InvalidYear { value, reason } => {
                write!(f, "invalid year '{}': {}", value, reason)
            }
        }
    }
}

/// Result of parsing one data line
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Parsed {
        row: WideRow,
        /// Month fields that could not be read as numbers and were left missing
        unparsable_fields: usize,
    },
    Rejected(RowRejection),
}

/// Parse a month value field
pub fn parse_numeric_field(field: &str) -> std::result::Result<f64, ParseFloatError> {
    field.trim().parse::<f64>()
}

/// Parse the leading year field
pub fn parse_year_field(field: &str) -> std::result::Result<i32, ParseIntError> {
    field.trim().parse::<i32>()
}

/// Parse a classified data line
pub fn parse_data_line(line: &DataLine<'_>) -> Result<RowOutcome> {
    parse_fields(line.fields())
}

/// Parse the fields of a data line.
///
/// Fewer than thirteen fields cannot come out of the classifier, so receiving
/// them here is reported as [`MrtsError::InvariantViolation`] rather than as a
/// rejected row.
pub fn parse_fields(fields: &[&str]) -> Result<RowOutcome> {
    if fields.len() < MIN_DATA_LINE_FIELDS {
        return Err(MrtsError::invariant(
            "row parser",
            format!(
                "expected at least {} fields from the line classifier, got {}",
                MIN_DATA_LINE_FIELDS,
                fields.len()
            ),
        ));
    }

    let year = match parse_year_field(fields[0]) {
        Ok(year) => year,
        Err(e) => {
            return Ok(RowOutcome::Rejected(RowRejection::InvalidYear {
                value: fields[0].to_string(),
                reason: e.to_string(),
            }));
        }
    };

    let mut month_values = [None; MONTHS_PER_YEAR];
    let mut unparsable_fields = 0;

    for (slot, field) in month_values.iter_mut().zip(&fields[1..=MONTHS_PER_YEAR]) {
        match parse_numeric_field(field) {
            Ok(value) => *slot = Some(value),
            Err(e) => {
                debug!("Month value '{}' in year {} left missing: {}", field, year, e);
                unparsable_fields += 1;
            }
        }
    }

    Ok(RowOutcome::Parsed {
        row: WideRow { year, month_values },
        unparsable_fields,
    })
}

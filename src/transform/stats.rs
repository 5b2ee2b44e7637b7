//! Stage statistics for the transformation pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason a candidate was dropped by validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Sales value was missing after parsing
    MissingSales,
    YearOutOfRange,
    MonthOutOfRange,
    /// Outside the sales bounds, typically a seasonal factor or percentage row
    SalesOutOfRange,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rejection::MissingSales => "missing sales value",
            Rejection::YearOutOfRange => "year out of range",
            Rejection::MonthOutOfRange => "month out of range",
            Rejection::SalesOutOfRange => "sales out of range",
        };
        f.write_str(text)
    }
}

/// Validation counts for one batch of candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterStats {
    pub input: usize,
    pub accepted: usize,
    pub missing_sales: usize,
    pub year_out_of_range: usize,
    pub month_out_of_range: usize,
    pub sales_out_of_range: usize,
}

impl FilterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_rejection(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::MissingSales => self.missing_sales += 1,
            Rejection::YearOutOfRange => self.year_out_of_range += 1,
            Rejection::MonthOutOfRange => self.month_out_of_range += 1,
            Rejection::SalesOutOfRange => self.sales_out_of_range += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.missing_sales
            + self.year_out_of_range
            + self.month_out_of_range
            + self.sales_out_of_range
    }

    /// Get quality filtering rate (percentage that passed)
    pub fn pass_rate(&self) -> f64 {
        if self.input == 0 {
            0.0
        } else {
            (self.accepted as f64 / self.input as f64) * 100.0
        }
    }
}

/// Merge counts across all source files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Facts entering the merge
    pub input: usize,
    /// Facts left after duplicate resolution
    pub output: usize,
    /// Facts replaced by a later fact with the same key
    pub duplicates_resolved: usize,
}

impl MergeStats {
    /// Percentage of input facts that were unique
    pub fn deduplication_effectiveness(&self) -> f64 {
        if self.input == 0 {
            0.0
        } else {
            (self.output as f64 / self.input as f64) * 100.0
        }
    }
}

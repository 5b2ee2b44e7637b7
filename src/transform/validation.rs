//! Candidate validation and filtering
//!
//! A candidate becomes a [`SalesFact`] only when its year, month and sales
//! value are present and in range. Rejected candidates are counted, never
//! reported as errors.
//!
//! The sales bounds are a heuristic. Release files interleave dollar totals
//! with seasonal factor and percentage rows that share the same layout; the
//! only thing telling them apart is magnitude. The default bounds exclude
//! those rows but are an approximation, so they are configurable.

use super::stats::{FilterStats, Rejection};
use crate::constants::{
    DEFAULT_MAX_SALES, DEFAULT_MAX_YEAR, DEFAULT_MIN_SALES, DEFAULT_MIN_YEAR, MONTHS_PER_YEAR,
};
use crate::models::{SalesCandidate, SalesFact};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Accepted ranges for facts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Inclusive
    pub min_year: i32,
    /// Inclusive
    pub max_year: i32,
    /// Exclusive, millions of dollars
    pub min_sales: f64,
    /// Exclusive, millions of dollars
    pub max_sales: f64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
            min_sales: DEFAULT_MIN_SALES,
            max_sales: DEFAULT_MAX_SALES,
        }
    }
}

impl ValidationRules {
    pub fn year_in_range(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }

    pub fn month_in_range(&self, month: u32) -> bool {
        (1..=MONTHS_PER_YEAR as u32).contains(&month)
    }

    /// NaN and infinities fall outside every finite bound
    pub fn sales_in_range(&self, sales: f64) -> bool {
        sales > self.min_sales && sales < self.max_sales
    }

    /// Validate a candidate, producing the fact or the first failed rule
    pub fn check(&self, candidate: &SalesCandidate) -> Result<SalesFact, Rejection> {
        let sales = candidate.sales.ok_or(Rejection::MissingSales)?;

        if !self.year_in_range(candidate.year) {
            return Err(Rejection::YearOutOfRange);
        }
        if !self.month_in_range(candidate.month) {
            return Err(Rejection::MonthOutOfRange);
        }
        if !self.sales_in_range(sales) {
            return Err(Rejection::SalesOutOfRange);
        }

        SalesFact::new(candidate.year, candidate.month, candidate.category, sales)
            .ok_or(Rejection::MonthOutOfRange)
    }

    /// Re-check an already built fact against these rules
    pub fn accepts(&self, fact: &SalesFact) -> bool {
        self.year_in_range(fact.year)
            && self.month_in_range(fact.month)
            && self.sales_in_range(fact.sales)
    }
}

/// Apply validation rules to a batch of candidates, preserving order
pub fn filter_candidates(
    candidates: Vec<SalesCandidate>,
    rules: &ValidationRules,
) -> (Vec<SalesFact>, FilterStats) {
    let mut stats = FilterStats::new();
    let mut facts = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        stats.input += 1;
        match rules.check(&candidate) {
            Ok(fact) => {
                stats.accepted += 1;
                facts.push(fact);
            }
            Err(rejection) => {
                debug!(
                    "Dropped {} {}-{:02}: {}",
                    candidate.category, candidate.year, candidate.month, rejection
                );
                stats.record_rejection(rejection);
            }
        }
    }

    info!(
        "Validation complete: {} -> {} facts ({} missing, {} year, {} sales out of range)",
        stats.input,
        stats.accepted,
        stats.missing_sales,
        stats.year_out_of_range,
        stats.sales_out_of_range
    );

    (facts, stats)
}

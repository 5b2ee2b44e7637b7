//! Test utilities for the transformation pipeline

use crate::models::{Category, SalesCandidate, SalesFact, WideRow};


/// Helper to create a fact that passes default validation
pub fn fact(year: i32, month: u32, category: Category, sales: f64) -> SalesFact {
    SalesFact::new(year, month, category, sales).unwrap()
}

pub fn candidate(year: i32, month: u32, sales: Option<f64>) -> SalesCandidate {
    SalesCandidate {
        year,
        month,
        category: Category::RetailTotal,
        sales,
    }
}

/// Wide row whose months run from `start` in steps of `step`
pub fn wide_row(year: i32, start: f64, step: f64) -> WideRow {
    let mut month_values = [None; 12];
    for (i, slot) in month_values.iter_mut().enumerate() {
        *slot = Some(start + step * i as f64);
    }
    WideRow { year, month_values }
}

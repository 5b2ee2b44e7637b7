//! Integration tests for the processor module
//!
//! Tests the complete processing pipeline using mock raw release layouts.

pub mod basic_processing;
pub mod error_handling;

use crate::config::MrtsConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Release text with a title block, month header and one line per year
pub fn release_text(title: &str, rows: &[(i32, [f64; 12])]) -> String {
    let mut text = format!(
        "            ADVANCE MONTHLY SALES FOR RETAIL AND FOOD SERVICES\n            {}\n                 [Millions of Dollars]\n\nYEAR   JAN   FEB   MAR   APR   MAY   JUN   JUL   AUG   SEP   OCT   NOV   DEC   TOTAL\n\n",
        title
    );
    for (year, values) in rows {
        text.push_str(&year.to_string());
        for value in values {
            text.push_str(&format!("   {}", value));
        }
        text.push('\n');
    }
    text.push_str("\nSeasonal factors\n");
    text.push_str("2021   0.95   0.96   0.97   0.98   0.99   1.00   1.01   1.02   1.03   1.04   1.05   1.06\n");
    text
}

/// Twelve months starting at `start` and rising by `step`
pub fn months(start: f64, step: f64) -> [f64; 12] {
    std::array::from_fn(|i| start + step * i as f64)
}

pub fn write_release(dir: &Path, name: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Quiet configuration reading from `input` and writing to `output`
pub fn test_config(input: &Path, output: &Path) -> MrtsConfig {
    MrtsConfig::default()
        .with_input_path(input)
        .with_output_path(output)
        .with_progress(false)
        .with_workers(2)
}

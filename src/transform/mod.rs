//! Record transformation pipeline for parsed release rows
//!
//! Turns wide rows into the canonical fact table and groups it for storage.
//! Every stage is a pure function over in-memory sequences.
//!
//! # Architecture
//!
//! - [`unpivot`] - expands each wide row into twelve monthly candidates
//! - [`validation`] - drops candidates outside the accepted year and sales ranges
//! - [`merge`] - combines per-file facts and resolves duplicate keys
//! - [`partition`] - groups facts by (year, month)
//! - [`stats`] - stage statistics
//!
//! # Processing Pipeline
//!
//! 1. **Unpivot**: `WideRow` + category -> twelve `SalesCandidate`s
//! 2. **Validate**: candidates -> `SalesFact`s (per file)
//! 3. **Merge**: all files' facts -> one fact per (year, month, category)
//! 4. **Partition**: facts -> one `Partition` per (year, month)
//!
//! Stages 1 and 2 run independently per source file; stage 3 is the single
//! point where files meet and is a deterministic collect-then-resolve step.

pub mod merge;
pub mod partition;
pub mod stats;
pub mod unpivot;
pub mod validation;

#[cfg(test)]
pub mod tests;

pub use merge::{FileFacts, analyze_duplicate_patterns, merge_facts};
pub use partition::partition_facts;
pub use stats::{FilterStats, MergeStats, Rejection};
pub use unpivot::{unpivot_row, unpivot_rows};
pub use validation::{ValidationRules, filter_candidates};

//! Fact merging and duplicate resolution
//!
//! Overlapping release files can carry the same (year, month, category).
//! Exactly one fact survives per key and the winner never depends on the
//! order in which files finished processing:
//!
//! 1. Files are ordered by source identifier (byte-wise, ascending).
//! 2. Facts are replayed file by file, each file in its own line order.
//! 3. A later fact replaces an earlier one with the same key.
//!
//! So the fact from the file whose identifier sorts last wins, and inside one
//! file the line appearing later wins. Source identifiers are expected to be unique;
//! files sharing an identifier keep the order they were passed in.

use super::stats::MergeStats;
use crate::models::{FactKey, SalesFact};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Validated facts from one source file, in file order
#[derive(Debug, Clone)]
pub struct FileFacts {
    pub source_id: String,
    pub facts: Vec<SalesFact>,
}

impl FileFacts {
    pub fn new(source_id: impl Into<String>, facts: Vec<SalesFact>) -> Self {
        Self {
            source_id: source_id.into(),
            facts,
        }
    }
}

/// Merge facts from all files into one set, sorted by (year, month, category)
pub fn merge_facts(mut files: Vec<FileFacts>) -> (Vec<SalesFact>, MergeStats) {
    files.sort_by(|a, b| a.source_id.cmp(&b.source_id));

    let source_ids: Vec<String> = files.iter().map(|file| file.source_id.clone()).collect();
    let mut stats = MergeStats::default();
    let mut merged: BTreeMap<FactKey, (usize, SalesFact)> = BTreeMap::new();

    for (file_index, file) in files.into_iter().enumerate() {
        for fact in file.facts {
            stats.input += 1;
            let key = fact.key();
            if let Some((previous_file, previous)) = merged.insert(key, (file_index, fact)) {
                stats.duplicates_resolved += 1;
                debug!(
                    "Duplicate {} {}-{:02}: {} from {} replaced by {}",
                    key.category,
                    key.year,
                    key.month,
                    previous.sales,
                    source_ids[previous_file],
                    source_ids[file_index]
                );
            }
        }
    }

    let facts: Vec<SalesFact> = merged.into_values().map(|(_, fact)| fact).collect();
    stats.output = facts.len();

    info!(
        "Merge complete: {} -> {} facts ({} duplicates resolved)",
        stats.input, stats.output, stats.duplicates_resolved
    );

    (facts, stats)
}

/// Count (total_keys, duplicated_keys, surplus_facts) before merging
pub fn analyze_duplicate_patterns(files: &[FileFacts]) -> (usize, usize, usize) {
    let mut groups: BTreeMap<FactKey, usize> = BTreeMap::new();

    for fact in files.iter().flat_map(|file| &file.facts) {
        *groups.entry(fact.key()).or_insert(0) += 1;
    }

    let total_keys = groups.len();
    let duplicated_keys = groups.values().filter(|&&count| count > 1).count();
    let surplus_facts = groups.values().map(|&count| count.saturating_sub(1)).sum();

    (total_keys, duplicated_keys, surplus_facts)
}

//! Grouping of facts into (year, month) partitions

use crate::models::{Partition, PartitionKey, PartitionRow, SalesFact};
use std::collections::BTreeMap;
use tracing::debug;

/// Group facts by (year, month).
///
/// Partitions come out in key order and rows inside a partition are ordered
/// by category label. Each fact lands in exactly one partition.
pub fn partition_facts(facts: Vec<SalesFact>) -> Vec<Partition> {
    let mut groups: BTreeMap<PartitionKey, Vec<PartitionRow>> = BTreeMap::new();

    for fact in facts {
        let date = fact.date_string();
        groups
            .entry(fact.partition_key())
            .or_default()
            .push(PartitionRow {
                category: fact.category,
                sales: fact.sales,
                date,
            });
    }

    debug!("Grouped facts into {} partitions", groups.len());

    groups
        .into_iter()
        .map(|(key, mut rows)| {
            rows.sort_by(|a, b| a.category.as_str().cmp(b.category.as_str()));
            Partition { key, rows }
        })
        .collect()
}

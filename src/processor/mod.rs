//! Job orchestration for MRTS processing.
//!
//! Runs one processing job end to end: discover the release files, parse
//! and validate each one independently, merge the per-file facts, group
//! them into partitions and write the curated table.
//!
//! Per-file work runs concurrently. Files meet only at the merge step, which
//! sorts its input itself, so the result does not depend on which file
//! finished first.

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::discovery::{DiscoveredSource, SourceDiscovery, read_source};
use self::writer::PartitionedParquetWriter;

use crate::config::MrtsConfig;
use crate::error::{MrtsError, Result};
use crate::models::{FileReport, Partition, ProcessingStats, SourceFile};
use crate::parser::parse_source;
use crate::schema::TableSchema;
use crate::transform::{
    FileFacts, MergeStats, ValidationRules, filter_candidates, merge_facts, partition_facts,
    unpivot_rows,
};

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tokio::task;
use tracing::{debug, info, warn};

/// Parse, unpivot and validate one source file
pub fn process_source(
    source: &SourceFile,
    rules: &ValidationRules,
) -> Result<(FileFacts, FileReport)> {
    let parsed = parse_source(source)?;
    let candidates = unpivot_rows(&parsed.rows, parsed.category);
    let (facts, filter) = filter_candidates(candidates, rules);

    let report = FileReport {
        source_id: parsed.source_id.clone(),
        category: parsed.category,
        parse: parsed.stats,
        filter,
    };

    Ok((FileFacts::new(parsed.source_id, facts), report))
}

/// Merged and partitioned output of a set of source files
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Ordered by (year, month)
    pub partitions: Vec<Partition>,
    /// Ordered by source identifier
    pub reports: Vec<FileReport>,
    pub merge: MergeStats,
    pub files_skipped: usize,
}

impl TransformOutput {
    pub fn fact_count(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }
}

/// Run the in-memory pipeline over already loaded sources
pub fn transform_sources(
    sources: &[SourceFile],
    rules: &ValidationRules,
) -> Result<TransformOutput> {
    let results = sources
        .iter()
        .map(|source| process_source(source, rules))
        .collect();
    assemble(results)
}

/// Combine per-file results: skip unusable files, abort on anything else
fn assemble(results: Vec<Result<(FileFacts, FileReport)>>) -> Result<TransformOutput> {
    let mut file_facts = Vec::with_capacity(results.len());
    let mut reports = Vec::with_capacity(results.len());
    let mut files_skipped = 0;

    for result in results {
        match result {
            Ok((facts, report)) => {
                file_facts.push(facts);
                reports.push(report);
            }
            Err(e) if e.is_recoverable() => {
                warn!("Skipping source: {}", e);
                files_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    reports.sort_by(|a, b| a.source_id.cmp(&b.source_id));
    for report in &reports {
        info!(
            "{} ({}): {} facts accepted, {} rejected ({} unparsable fields)",
            report.source_id,
            report.category,
            report.filter.accepted,
            report.rejected(),
            report.parse.unparsable_fields
        );
    }

    let (facts, merge) = merge_facts(file_facts);
    let partitions = partition_facts(facts);

    Ok(TransformOutput {
        partitions,
        reports,
        merge,
        files_skipped,
    })
}

/// Main processor for MRTS release files
#[derive(Debug)]
pub struct SalesProcessor {
    config: MrtsConfig,
}

impl SalesProcessor {
    /// Create a processor, rejecting inconsistent configuration up front
    pub fn new(config: MrtsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        let show = self.config.show_progress;

        if show {
            println!("{}", "Starting MRTS processing".bright_green().bold());
            println!("  {} {}", "Input:".bright_cyan(), self.config.ingest_dir().display());
            println!("  {} {}", "Output:".bright_cyan(), self.config.output_path.display());
        }

        let mut stats = ProcessingStats {
            output_path: self.config.output_path.clone(),
            ..ProcessingStats::default()
        };

        // Step 1: Discover release files
        let mut discovery = SourceDiscovery::from_config(&self.config);
        let sources = discovery.discover()?;
        stats.files_discovered = sources.len();
        stats.files_skipped = discovery.skipped();
        info!(
            "Discovered {} release files in {}",
            sources.len(),
            self.config.ingest_dir().display()
        );

        if sources.is_empty() {
            warn!("No release files found, nothing to write");
            stats.processing_time_ms = start_time.elapsed().as_millis();
            return Ok(stats);
        }

        // Step 2: Parse and validate files concurrently
        let results = self.process_files(sources).await;
        let output = assemble(results)?;

        stats.files_skipped += output.files_skipped;
        stats.files_processed = output.reports.len();
        stats.merge = output.merge.clone();

        // Step 3: Write partitions
        if self.config.dry_run {
            info!(
                "Dry run: {} partitions ({} facts) not written",
                output.partitions.len(),
                output.fact_count()
            );
            if show {
                self.print_planned_partitions(&output.partitions);
            }
        } else if !output.partitions.is_empty() {
            let summary = self.write_output(output.partitions).await?;
            stats.partitions_written = summary.partitions_written;
            stats.facts_written = summary.rows_written;
        } else {
            warn!("No facts survived validation, nothing to write");
        }

        stats.file_reports = output.reports;
        stats.processing_time_ms = start_time.elapsed().as_millis();

        if show {
            print_summary(&stats, self.config.dry_run);
        }

        Ok(stats)
    }

    async fn process_files(
        &self,
        sources: Vec<DiscoveredSource>,
    ) -> Vec<Result<(FileFacts, FileReport)>> {
        let pb = self.progress_bar(sources.len());
        let workers = self.config.workers.min(sources.len()).max(1);
        debug!("Processing {} files with {} workers", sources.len(), workers);

        let results = stream::iter(sources)
            .map(|source| {
                let rules = self.config.validation.clone();
                let pb = pb.clone();
                async move {
                    pb.set_message(source.source_id.clone());
                    let result = process_discovered(source, rules).await;
                    pb.inc(1);
                    result
                }
            })
            .buffer_unordered(workers)
            .collect::<Vec<_>>()
            .await;

        pb.finish_with_message("All release files processed");
        results
    }

    async fn write_output(&self, partitions: Vec<Partition>) -> Result<writer::WriteSummary> {
        let writer =
            PartitionedParquetWriter::new(&self.config.output_path, self.config.output.clone());
        let table = self.config.catalog.as_ref().map(|catalog| {
            TableSchema::new(catalog, self.config.output_path.display().to_string())
        });

        task::spawn_blocking(move || {
            let summary = writer.write_all(&partitions)?;
            if let Some(table) = table {
                writer.write_table_ddl(&table)?;
            }
            Ok::<_, MrtsError>(summary)
        })
        .await
        .map_err(|e| MrtsError::OutputWrite {
            path: self.config.output_path.clone(),
            reason: format!("Writer task failed: {}", e),
        })?
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }

    fn print_planned_partitions(&self, partitions: &[Partition]) {
        println!("\n{}", "Dry run - partitions that would be written".bright_yellow());
        for partition in partitions {
            println!(
                "  {} ({} rows)",
                self.config
                    .output_path
                    .join(partition.key.relative_dir())
                    .display(),
                partition.len().to_string().bright_white()
            );
        }
    }
}

/// Read one file, then run the CPU-bound stages on the blocking pool
async fn process_discovered(
    source: DiscoveredSource,
    rules: ValidationRules,
) -> Result<(FileFacts, FileReport)> {
    let file = read_source(&source).await?;

    task::spawn_blocking(move || process_source(&file, &rules))
        .await
        .map_err(|e| {
            MrtsError::invariant(
                "file worker",
                format!("task for {} failed: {}", source.source_id, e),
            )
        })?
}

fn print_summary(stats: &ProcessingStats, dry_run: bool) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_skipped > 0 {
        println!(
            "  {} {}",
            "Files skipped:".bright_red(),
            stats.files_skipped.to_string().bright_red().bold()
        );
    }
    for report in stats.file_reports.iter().filter(|r| r.rejected() > 0) {
        println!(
            "  {} {} rejected in {}",
            "Rejected:".bright_yellow(),
            report.rejected().to_string().bright_yellow(),
            report.source_id
        );
    }
    println!(
        "  {} {} ({} duplicates resolved)",
        "Facts merged:".bright_cyan(),
        stats.merge.output.to_string().bright_white(),
        stats.merge.duplicates_resolved
    );
    if !dry_run {
        println!(
            "  {} {} in {} partitions",
            "Facts written:".bright_cyan(),
            stats.facts_written.to_string().bright_white().bold(),
            stats.partitions_written.to_string().bright_white().bold()
        );
    }
}

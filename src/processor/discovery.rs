//! Source discovery for MRTS release files
//!
//! Finds the raw release files for a job and decides which category each
//! one carries. Files come either from explicit glob patterns in the
//! configuration or from a recursive scan of the ingest directory, in which
//! case the category is inferred from the file name.

use crate::config::MrtsConfig;
use crate::constants::SOURCE_FILE_EXTENSIONS;
use crate::error::{MrtsError, Result};
use crate::models::{Category, SourceFile};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A release file located on disk, not yet read
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredSource {
    pub path: PathBuf,
    /// Path relative to the raw root, with `/` separators
    pub source_id: String,
    pub category: Category,
}

/// File discovery component for MRTS release files
#[derive(Debug)]
pub struct SourceDiscovery {
    config: MrtsConfig,
    scan_root: PathBuf,
    skipped: usize,
}

impl SourceDiscovery {
    pub fn from_config(config: &MrtsConfig) -> Self {
        Self {
            config: config.clone(),
            scan_root: config.ingest_dir(),
            skipped: 0,
        }
    }

    /// Files found but left out because no category could be determined
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Discover release files, sorted by source identifier
    ///
    /// Expected layout written by the retrieval step:
    /// ```text
    /// raw/retail_sales/
    ///   ingest_date=2024-01-15/
    ///     retail_total.csv
    ///     motor_vehicle.csv
    ///   ingest_date=2024-02-15/
    ///     adv44000.txt
    /// ```
    pub fn discover(&mut self) -> Result<Vec<DiscoveredSource>> {
        if !self.scan_root.is_dir() {
            return Err(MrtsError::InputNotFound {
                path: self.scan_root.clone(),
            });
        }

        debug!("Searching for release files in: {}", self.scan_root.display());

        let found = if self.config.sources.is_empty() {
            self.scan_and_infer()?
        } else {
            self.match_patterns()?
        };

        let discovered: Vec<DiscoveredSource> = found
            .into_iter()
            .filter(|source| {
                let allowed = self.config.allows_category(source.category);
                if !allowed {
                    debug!("Skipping {} ({} not selected)", source.source_id, source.category);
                }
                allowed
            })
            .collect();

        debug!(
            "Found {} release files ({} without a known category)",
            discovered.len(),
            self.skipped
        );

        Ok(discovered)
    }

    /// Recursive scan with the category taken from each file stem
    fn scan_and_infer(&mut self) -> Result<Vec<DiscoveredSource>> {
        let mut found = Vec::new();

        for entry in WalkDir::new(&self.scan_root).sort_by_file_name() {
            let entry = entry.map_err(|e| MrtsError::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_release_file(path) {
                continue;
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            match Category::from_file_stem(stem) {
                Some(category) => found.push(self.describe(path, category)),
                None => {
                    warn!(
                        "Skipping {}: category not recognised from file name",
                        path.display()
                    );
                    self.skipped += 1;
                }
            }
        }

        found.sort_by(|a, b| a.source_id.cmp(&b.source_id));
        Ok(found)
    }

    /// Files matched by the configured patterns; the first matching pattern wins
    fn match_patterns(&self) -> Result<Vec<DiscoveredSource>> {
        let mut found: BTreeMap<String, DiscoveredSource> = BTreeMap::new();
        let escaped_root = glob::Pattern::escape(&self.scan_root.to_string_lossy());

        for spec in &self.config.sources {
            let pattern = format!("{}/{}", escaped_root, spec.pattern);
            let paths = glob::glob(&pattern).map_err(|e| {
                MrtsError::configuration(format!(
                    "Invalid source pattern '{}': {}",
                    spec.pattern, e
                ))
            })?;

            let mut matched = 0;
            for path in paths {
                let path = path.map_err(|e| MrtsError::Io(e.into()))?;
                if !path.is_file() {
                    continue;
                }
                matched += 1;
                let source = self.describe(&path, spec.category);
                found.entry(source.source_id.clone()).or_insert(source);
            }

            if matched == 0 {
                warn!("Source pattern '{}' matched no files", spec.pattern);
            }
        }

        Ok(found.into_values().collect())
    }

    fn describe(&self, path: &Path, category: Category) -> DiscoveredSource {
        DiscoveredSource {
            path: path.to_path_buf(),
            source_id: source_id_for(&self.config.input_path, path),
            category,
        }
    }
}

/// Check if a path has a release file extension, ignoring case
fn is_release_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOURCE_FILE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

fn source_id_for(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read a discovered file; failures are per-file and recoverable
pub async fn read_source(source: &DiscoveredSource) -> Result<SourceFile> {
    let bytes = fs::read(&source.path)
        .await
        .map_err(|e| MrtsError::source_read(&source.source_id, e.to_string()))?;

    Ok(SourceFile::from_bytes(
        source.source_id.clone(),
        source.category,
        &bytes,
    ))
}

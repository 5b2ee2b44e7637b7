//! Error handling for MRTS processing operations.
//!
//! Row-level parse problems are not errors: they are counted in
//! [`crate::parser::ParseStats`] and the row is dropped. The variants here
//! cover file-level failures (recovered by the processor), configuration
//! problems, and structural defects that must abort the job.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MrtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Input directory not found: {path}")]
    InputNotFound { path: PathBuf },

    /// A whole source file could not be used (missing, empty, or no data lines).
    #[error("Unable to read source '{source_id}': {reason}")]
    SourceRead { source_id: String, reason: String },

    /// An upstream component handed over data that breaks its own guarantee.
    #[error("Invariant violated in {component}: {detail}")]
    InvariantViolation {
        component: &'static str,
        detail: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to write output at {path}: {reason}")]
    OutputWrite { path: PathBuf, reason: String },

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl MrtsError {
    pub fn source_read(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceRead {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invariant(component: &'static str, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            component,
            detail: detail.into(),
        }
    }

    /// True for failures that only affect one source file and can be skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SourceRead { .. })
    }
}

pub type Result<T> = std::result::Result<T, MrtsError>;

//! Error types for LeadGen.
//!
//! Library crates use [`LeadGenError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all LeadGen operations.
#[derive(Debug, thiserror::Error)]
pub enum LeadGenError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A raw source record is missing a required field.
    #[error("schema error: {provenance} record is missing required field `{field}`")]
    Schema {
        /// Name of the missing field.
        field: &'static str,
        /// Provenance of the offending record.
        provenance: String,
    },

    /// The funding lookup failed for a company.
    #[error("enrichment lookup failed for {company}: {message}")]
    EnrichmentLookup { company: String, message: String },

    /// Network/HTTP error while talking to a source.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be parsed (JSON or XML).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A collaborator did not answer within its time budget.
    #[error("timed out after {secs}s: {operation}")]
    Timeout { operation: String, secs: u64 },

    /// Scoring could not produce a ranking.
    #[error("scoring error: {0}")]
    Scoring(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (invalid input, bad option values, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LeadGenError>;

impl LeadGenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a schema error for a record missing `field`.
    pub fn schema(field: &'static str, provenance: impl Into<String>) -> Self {
        Self::Schema {
            field,
            provenance: provenance.into(),
        }
    }

    /// Create an enrichment lookup error for `company`.
    pub fn lookup(company: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::EnrichmentLookup {
            company: company.into(),
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a timeout error for the named operation.
    pub fn timeout(operation: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            secs,
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }
}

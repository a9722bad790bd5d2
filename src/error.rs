//! Error types for taxstat
//!
//! Every failure the tool can report ends up here, so `main` has a single
//! place to print a diagnostic and pick the exit code.

use thiserror::Error;

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, TaxstatError>;

#[derive(Error, Debug)]
pub enum TaxstatError {
    /// Bad command line: unknown flag, missing value, leftover arguments, no taxa
    #[error("{0}")]
    Argument(String),

    /// The data retrieval program could not be found
    #[error("required tool '{program}' not found. Install NCBI datasets or point {env} at it.")]
    ToolMissing { program: String, env: &'static str },

    /// The data retrieval program could not be started or exited with an error
    #[error("'{program}' failed for taxon '{taxon}': {detail}")]
    ToolFailed {
        program: String,
        taxon: String,
        detail: String,
    },

    /// The program answered with something that is not the expected JSON
    #[error("malformed {summary} summary for taxon '{taxon}': {source}")]
    MalformedJson {
        taxon: String,
        summary: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON parsed but the value we need is not in it
    #[error("no {field} reported for taxon '{taxon}'")]
    MissingField { taxon: String, field: &'static str },

    /// Reading the taxa file or writing the table failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaxstatError {
    pub fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    /// Errors raised while fetching a single taxon; these are the ones
    /// `--ignore-errors` turns into an `NA` row.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::ToolFailed { .. } | Self::MalformedJson { .. } | Self::MissingField { .. }
        )
    }
}

//! Error types for eadsync-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Role;

/// All errors that can arise from loading and validating a sync job file.
#[derive(Debug, Error)]
pub enum JobError {
    /// Underlying I/O failure reading the job file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse sync job at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Neither `<role>_repo_id` nor `<role>_repo_code` was supplied.
    #[error("{role}: set {role}_repo_id or {role}_repo_code")]
    MissingRepoTarget { role: Role },
}

/// Convenience constructor for [`JobError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> JobError {
    JobError::Io {
        path: path.into(),
        source,
    }
}

/// A failed repository API call.
///
/// Every variant except [`ApiError::CapabilityMissing`] is recoverable:
/// the orchestrator logs it, tallies the record as failed, and moves on.
/// `CapabilityMissing` aborts the run — no record can be converted without
/// the destination's format-conversion capability.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection-level failure (DNS, TLS, timeout, refused).
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP response, with the response body for diagnosis.
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A response body that did not decode as the expected JSON shape.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A destination capability the pipeline depends on is not installed.
    #[error("destination capability not installed: {capability}")]
    CapabilityMissing { capability: String },
}

impl ApiError {
    /// True for the one error that must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::CapabilityMissing { .. })
    }
}

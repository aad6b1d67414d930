//! Error types for eadsync-pipeline.

use thiserror::Error;

use eadsync_core::error::ApiError;

/// Fatal pipeline errors — everything recoverable is tallied per record
/// instead of surfacing here.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The destination's format-conversion capability is not installed;
    /// no record can be migrated without it.
    #[error("destination capability not installed: {capability}")]
    CapabilityMissing { capability: String },

    /// The modified-record listing could not advance, so the candidate
    /// stream is broken.
    #[error("failed to list modified records (page {page}): {source}")]
    Listing {
        page: u32,
        #[source]
        source: ApiError,
    },
}

/// Errors from re-serializing a fetched EAD export. Per-record.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

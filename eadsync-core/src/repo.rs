//! Repository interfaces consumed by the sync pipeline.
//!
//! Transport, authentication, and session handling live behind these two
//! traits (implemented over HTTP in `eadsync-client`); the pipeline itself
//! never sees a URL. Tests drive the pipeline with in-memory fakes.

use crate::error::ApiError;
use crate::types::{MatchingIdentifier, ResourcePage};

/// The instance records are migrated *from*.
pub trait SourceRepository {
    /// One page of the modified-record listing.
    ///
    /// `modified_since` is a Unix timestamp lower bound; pages are numbered
    /// from 1 and fixed at the session page size.
    fn resource_page(&mut self, modified_since: i64, page: u32) -> Result<ResourcePage, ApiError>;

    /// The canonical EAD XML export of one record, untouched.
    fn resource_description(&mut self, record_id: &str) -> Result<String, ApiError>;
}

/// The instance records are migrated *to*.
pub trait DestinationRepository {
    /// Convert an EAD XML payload into importable JSON.
    ///
    /// Runs above the sub-repository scope; implementations must restore
    /// the session scope on every exit path. Returns
    /// [`ApiError::CapabilityMissing`] when the conversion capability is
    /// not installed — the one conversion failure that aborts the run.
    fn convert_to_import_json(&mut self, ead_xml: &str) -> Result<String, ApiError>;

    /// Look up an existing record by matching identifier; returns the first
    /// match's record URI.
    fn find_resource_by_identifier(
        &mut self,
        identifier: &MatchingIdentifier,
    ) -> Result<Option<String>, ApiError>;

    /// Delete a record ahead of reimport. The destination cannot overlay,
    /// so this is the only way to make room for a fresh copy.
    fn delete_resource(&mut self, record_uri: &str) -> Result<(), ApiError>;

    /// Submit converted JSON to the batch-import endpoint.
    fn import_batch(&mut self, json: &str) -> Result<(), ApiError>;
}

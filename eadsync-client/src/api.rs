//! Repository trait implementations over the HTTP session.
//!
//! Maps the pipeline's [`SourceRepository`] / [`DestinationRepository`]
//! interfaces onto the instance API: listing, EAD export, format
//! conversion, identifier lookup, deletion, and batch import.

use serde::Deserialize;

use eadsync_core::error::ApiError;
use eadsync_core::repo::{DestinationRepository, SourceRepository};
use eadsync_core::types::{MatchingIdentifier, ResourcePage};

use crate::session::{read_body, read_json, Session, PAGE_SIZE};

/// Path of the destination's format-conversion capability (EAD → JSON).
const CONVERT_PATH: &str = "plugins/jsonmodel_from_format/resource/ead";

/// Error marker the instance returns for a route that is not installed.
const ROUTE_MISSING: &str = "Sinatra::NotFound";

#[derive(Debug, Deserialize)]
struct FindByIdResponse {
    #[serde(default)]
    resources: Vec<RefEntry>,
}

#[derive(Debug, Deserialize)]
struct RefEntry {
    #[serde(rename = "ref")]
    reference: String,
}

impl SourceRepository for Session {
    fn resource_page(&mut self, modified_since: i64, page: u32) -> Result<ResourcePage, ApiError> {
        let since = modified_since.to_string();
        let page = page.to_string();
        let page_size = PAGE_SIZE.to_string();
        let response = self.get(
            "resources",
            &[
                ("modified_since", since.as_str()),
                ("page", page.as_str()),
                ("page_size", page_size.as_str()),
            ],
        )?;
        read_json(response)
    }

    fn resource_description(&mut self, record_id: &str) -> Result<String, ApiError> {
        let response = self.get(
            &format!("resource_descriptions/{record_id}.xml"),
            &[
                ("include_unpublished", "false"),
                ("include_daos", "true"),
                ("numbered_cs", "true"),
                ("print_pdf", "false"),
            ],
        )?;
        read_body(response)
    }
}

impl DestinationRepository for Session {
    fn convert_to_import_json(&mut self, ead_xml: &str) -> Result<String, ApiError> {
        // Conversion is a system-level capability; the guard lifts the
        // sub-repository scope and restores it when dropped.
        let unscoped = self.clear_repo_scope();
        tracing::info!("[destination] converting record to importable json");
        match unscoped.post_string(CONVERT_PATH, ead_xml) {
            Ok(response) => read_body(response),
            Err(ApiError::Status { status, body }) => Err(classify_convert_failure(status, body)),
            Err(other) => Err(other),
        }
    }

    fn find_resource_by_identifier(
        &mut self,
        identifier: &MatchingIdentifier,
    ) -> Result<Option<String>, ApiError> {
        let response = self.get("find_by_id/resources", &[("identifier[]", identifier.as_str())])?;
        let found: FindByIdResponse = read_json(response)?;
        Ok(found.resources.into_iter().next().map(|r| r.reference))
    }

    fn delete_resource(&mut self, record_uri: &str) -> Result<(), ApiError> {
        let record_id = record_uri.rsplit('/').next().unwrap_or(record_uri);
        tracing::info!("[destination] deleting record {record_uri}");
        self.delete(&format!("resources/{record_id}"))?;
        Ok(())
    }

    fn import_batch(&mut self, json: &str) -> Result<(), ApiError> {
        tracing::info!("[destination] importing record batch: {}", self.base_url());
        self.post_string("batch_imports", json)?;
        Ok(())
    }
}

/// Split the two failure modes of the conversion capability.
///
/// A missing route (the instance never installed the conversion plugin)
/// surfaces as an HTTP error whose structured body names `Sinatra::NotFound`;
/// that is a configuration error and fatal to the run. Everything else is a
/// per-record conversion failure.
fn classify_convert_failure(status: u16, body: String) -> ApiError {
    let route_missing = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str().map(str::to_owned)))
        .is_some_and(|marker| marker == ROUTE_MISSING);

    if route_missing {
        ApiError::CapabilityMissing {
            capability: CONVERT_PATH.to_string(),
        }
    } else {
        ApiError::Status { status, body }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

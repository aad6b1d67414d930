//! The per-record migration loop.
//!
//! Pulls pages of candidates from the source, drives each record through
//! filter → identify → reconcile → fetch → transform → convert → transform
//! → delete-if-matched → import, and isolates failures at record
//! granularity: one bad record never aborts the run. The two fatal
//! conditions (unresolvable repository, missing conversion capability)
//! propagate as errors; everything else becomes a tallied outcome.

use std::fmt;

use serde::Serialize;

use eadsync_core::error::ApiError;
use eadsync_core::job::SyncJob;
use eadsync_core::repo::{DestinationRepository, SourceRepository};
use eadsync_core::types::{ExistingPolicy, IdGenerator, MatchingIdentifier, Resource};

use crate::error::SyncError;
use crate::transform::{Stage, Transforms};
use crate::{fetch, identifier, window};

// ---------------------------------------------------------------------------
// Run parameters
// ---------------------------------------------------------------------------

/// Immutable parameters for one migration run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Unix timestamp lower bound for candidate selection.
    pub modified_since: i64,
    pub id_generator: IdGenerator,
    /// Allow-list of source record URIs; empty means no filter.
    pub target_uris: Vec<String>,
    pub existing_policy: ExistingPolicy,
    /// Run the pipeline through conversion but write nothing.
    pub dry_run: bool,
}

impl RunOptions {
    /// Derive run parameters from a loaded job.
    pub fn from_job(job: &SyncJob) -> RunOptions {
        RunOptions {
            modified_since: window::modified_since(job.recent_only),
            id_generator: job.id_generator,
            target_uris: job.source_target_record_uris.clone(),
            existing_policy: job.existing_policy(),
            dry_run: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// The pipeline step a recoverable failure happened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Identify,
    Lookup,
    Fetch,
    Convert,
    Delete,
    Import,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Identify => "identify",
            Step::Lookup => "lookup",
            Step::Fetch => "fetch",
            Step::Convert => "convert",
            Step::Delete => "delete",
            Step::Import => "import",
        };
        write!(f, "{name}")
    }
}

/// What happened to one candidate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Imported; the destination had no prior copy.
    Imported {
        uri: String,
        identifier: MatchingIdentifier,
    },
    /// An existing destination copy was deleted, then the record imported.
    Replaced {
        uri: String,
        identifier: MatchingIdentifier,
        replaced_ref: String,
    },
    /// Skip policy: a destination copy exists and was left alone.
    SkippedExisting {
        uri: String,
        identifier: MatchingIdentifier,
    },
    /// Dry run: conversion succeeded, nothing was written.
    WouldImport {
        uri: String,
        identifier: MatchingIdentifier,
    },
    /// A recoverable failure; the record was abandoned for this run.
    Failed { uri: String, step: Step },
}

/// Tally of a completed run.
///
/// The run as a whole still succeeds when records fail individually, but
/// the tally makes partial failure visible to callers without log
/// scraping.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    /// Records the listing yielded.
    pub considered: usize,
    /// Records dropped by the publish filter or the allow-list.
    pub filtered: usize,
    pub outcomes: Vec<RecordOutcome>,
}

impl RunSummary {
    pub fn imported(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Imported { .. }))
    }

    pub fn replaced(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Replaced { .. }))
    }

    pub fn skipped_existing(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::SkippedExisting { .. }))
    }

    pub fn would_import(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::WouldImport { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Run the migration: page through candidates and pipeline each record.
pub fn run(
    source: &mut dyn SourceRepository,
    destination: &mut dyn DestinationRepository,
    options: &RunOptions,
    transforms: &Transforms,
) -> Result<RunSummary, SyncError> {
    tracing::info!("using modified since: {}", options.modified_since);
    tracing::info!("using id generator: {}", options.id_generator);

    let mut summary = RunSummary::default();
    let mut page = 1;
    loop {
        let listing = source
            .resource_page(options.modified_since, page)
            .map_err(|err| SyncError::Listing { page, source: err })?;

        for resource in &listing.results {
            summary.considered += 1;
            if !passes_filter(resource, options) {
                summary.filtered += 1;
                continue;
            }
            let outcome = migrate_record(source, destination, resource, options, transforms)?;
            summary.outcomes.push(outcome);
        }

        if !listing.has_next() {
            break;
        }
        page += 1;
    }

    tracing::info!(
        "run complete: {} imported, {} replaced, {} skipped, {} failed, {} filtered",
        summary.imported(),
        summary.replaced(),
        summary.skipped_existing(),
        summary.failed(),
        summary.filtered,
    );
    Ok(summary)
}

/// Publish flag first, then the explicit allow-list when one is configured.
fn passes_filter(resource: &Resource, options: &RunOptions) -> bool {
    if !resource.publish {
        return false;
    }
    options.target_uris.is_empty() || options.target_uris.contains(&resource.uri)
}

/// Pipeline one record. `Err` only for the fatal conversion condition;
/// every recoverable failure returns a [`RecordOutcome::Failed`].
fn migrate_record(
    source: &mut dyn SourceRepository,
    destination: &mut dyn DestinationRepository,
    resource: &Resource,
    options: &RunOptions,
    transforms: &Transforms,
) -> Result<RecordOutcome, SyncError> {
    let failed = |step: Step| RecordOutcome::Failed {
        uri: resource.uri.clone(),
        step,
    };

    // Identify.
    let identifier = match identifier::resolve(resource, options.id_generator) {
        Ok(identifier) => identifier,
        Err(err) => {
            tracing::error!("[source] cannot identify {}: {err}", resource.uri);
            return Ok(failed(Step::Identify));
        }
    };
    tracing::info!(
        "[source] using record {identifier} ({}): {}",
        resource.title,
        resource.uri
    );

    // Reconcile: look up an existing destination copy.
    let existing = match destination.find_resource_by_identifier(&identifier) {
        Ok(existing) => existing,
        Err(err) => {
            tracing::error!("[destination] lookup failed for {identifier}: {err}");
            return Ok(failed(Step::Lookup));
        }
    };
    if let Some(existing_ref) = &existing {
        if options.existing_policy == ExistingPolicy::Skip {
            tracing::info!(
                "[destination] record {identifier} already exists ({existing_ref}); skipping"
            );
            return Ok(RecordOutcome::SkippedExisting {
                uri: resource.uri.clone(),
                identifier,
            });
        }
    }

    // Fetch and normalize the EAD export.
    let Some(ead) = fetch::fetch_description(source, resource) else {
        return Ok(failed(Step::Fetch));
    };

    // Transform, convert, transform.
    let ead = transforms.apply(Stage::PreConvert, &ead);
    let import_json = match destination.convert_to_import_json(&ead) {
        Ok(json) => json,
        Err(ApiError::CapabilityMissing { capability }) => {
            tracing::error!("[destination] {capability} is not installed; aborting run");
            return Err(SyncError::CapabilityMissing { capability });
        }
        Err(err) => {
            tracing::error!("[destination] error converting record {identifier}: {err}");
            return Ok(failed(Step::Convert));
        }
    };
    let import_json = transforms.apply(Stage::PostConvert, &import_json);

    if options.dry_run {
        tracing::info!("[dry-run] would import record {identifier}");
        return Ok(RecordOutcome::WouldImport {
            uri: resource.uri.clone(),
            identifier,
        });
    }

    // The destination cannot overlay: clear any existing copy before import.
    if let Some(existing_ref) = &existing {
        if let Err(err) = destination.delete_resource(existing_ref) {
            tracing::error!("[destination] failed to delete {existing_ref}: {err}");
            return Ok(failed(Step::Delete));
        }
    }

    // Import.
    match destination.import_batch(&import_json) {
        Ok(()) => Ok(match existing {
            Some(replaced_ref) => RecordOutcome::Replaced {
                uri: resource.uri.clone(),
                identifier,
                replaced_ref,
            },
            None => RecordOutcome::Imported {
                uri: resource.uri.clone(),
                identifier,
            },
        }),
        Err(err) => {
            tracing::error!("[destination] error importing record {identifier}: {err}");
            Ok(failed(Step::Import))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(uri: &str, publish: bool) -> Resource {
        Resource {
            uri: uri.to_string(),
            title: String::new(),
            publish,
            id_0: Some("MS1".to_string()),
            id_1: None,
            id_2: None,
            id_3: None,
        }
    }

    fn base_options() -> RunOptions {
        RunOptions {
            modified_since: 0,
            id_generator: IdGenerator::Smushed,
            target_uris: Vec::new(),
            existing_policy: ExistingPolicy::Replace,
            dry_run: false,
        }
    }

    #[test]
    fn publish_filter_wins_over_allow_list() {
        let options = RunOptions {
            target_uris: vec!["/r/1".to_string()],
            ..base_options()
        };
        assert!(!passes_filter(&record("/r/1", false), &options));
        assert!(passes_filter(&record("/r/1", true), &options));
    }

    #[test]
    fn empty_allow_list_passes_everything_published() {
        let options = base_options();
        assert!(passes_filter(&record("/r/anything", true), &options));
    }

    #[test]
    fn allow_list_excludes_unlisted_uris() {
        let options = RunOptions {
            target_uris: vec!["/r/2".to_string()],
            ..base_options()
        };
        assert!(!passes_filter(&record("/r/1", true), &options));
    }

    #[test]
    fn summary_counts_by_outcome() {
        let identifier = MatchingIdentifier(r#"["MS1"]"#.to_string());
        let summary = RunSummary {
            considered: 4,
            filtered: 1,
            outcomes: vec![
                RecordOutcome::Imported {
                    uri: "/r/1".to_string(),
                    identifier: identifier.clone(),
                },
                RecordOutcome::Replaced {
                    uri: "/r/2".to_string(),
                    identifier: identifier.clone(),
                    replaced_ref: "/d/9".to_string(),
                },
                RecordOutcome::Failed {
                    uri: "/r/3".to_string(),
                    step: Step::Import,
                },
            ],
        };
        assert_eq!(summary.imported(), 1);
        assert_eq!(summary.replaced(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.skipped_existing(), 0);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(r#""outcome":"failed""#));
        assert!(json.contains(r#""step":"import""#));
    }
}

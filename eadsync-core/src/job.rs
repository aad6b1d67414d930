//! Sync job configuration.
//!
//! A job file names the two repository instances and the run parameters.
//! Files are parsed with serde_yaml, which accepts both YAML and plain
//! JSON event payloads:
//!
//! ```yaml
//! source_url: https://archives.example.edu/api
//! source_username: sync
//! source_password: secret
//! source_repo_id: 2
//! destination_url: https://mirror.example.edu/api
//! destination_username: sync
//! destination_password: secret
//! destination_repo_code: mirror
//! recent_only: true
//! id_generator: smushed
//! ```
//!
//! Validation happens at load time: each role must address its
//! sub-repository by id or by code, and the identifier strategy is a
//! closed enum — bad values fail the parse, not the run.

use std::path::Path;

use serde::Deserialize;

use crate::error::{io_err, JobError};
use crate::types::{ExistingPolicy, IdGenerator, RepoTarget, Role};

/// Run parameters for a single migration, immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncJob {
    pub source_url: String,
    pub source_username: String,
    pub source_password: String,
    #[serde(default)]
    pub source_repo_id: Option<u32>,
    #[serde(default)]
    pub source_repo_code: Option<String>,

    pub destination_url: String,
    pub destination_username: String,
    pub destination_password: String,
    #[serde(default)]
    pub destination_repo_id: Option<u32>,
    #[serde(default)]
    pub destination_repo_code: Option<String>,

    /// Restrict candidates to records modified in the last day.
    #[serde(default)]
    pub recent_only: bool,

    /// Identifier strategy used to correlate source and destination records.
    #[serde(default)]
    pub id_generator: IdGenerator,

    /// Optional allow-list of source record URIs; empty means no filter.
    #[serde(default)]
    pub source_target_record_uris: Vec<String>,

    /// Leave matched destination records alone instead of replacing them.
    #[serde(default)]
    pub destination_skip_existing: bool,
}

impl SyncJob {
    /// Load and validate a job file.
    pub fn load_at(path: &Path) -> Result<SyncJob, JobError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let job: SyncJob = serde_yaml::from_str(&contents).map_err(|e| JobError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        job.validate()?;
        Ok(job)
    }

    /// Both roles must address a sub-repository.
    pub fn validate(&self) -> Result<(), JobError> {
        for role in [Role::Source, Role::Destination] {
            if self.repo_target(role).is_none() {
                return Err(JobError::MissingRepoTarget { role });
            }
        }
        Ok(())
    }

    pub fn url(&self, role: Role) -> &str {
        match role {
            Role::Source => &self.source_url,
            Role::Destination => &self.destination_url,
        }
    }

    pub fn username(&self, role: Role) -> &str {
        match role {
            Role::Source => &self.source_username,
            Role::Destination => &self.destination_username,
        }
    }

    pub fn password(&self, role: Role) -> &str {
        match role {
            Role::Source => &self.source_password,
            Role::Destination => &self.destination_password,
        }
    }

    /// The sub-repository target for a role. A numeric id wins over a code
    /// when both are present.
    pub fn repo_target(&self, role: Role) -> Option<RepoTarget> {
        let (id, code) = match role {
            Role::Source => (self.source_repo_id, self.source_repo_code.as_ref()),
            Role::Destination => (
                self.destination_repo_id,
                self.destination_repo_code.as_ref(),
            ),
        };
        match (id, code) {
            (Some(id), _) => Some(RepoTarget::Id(id)),
            (None, Some(code)) => Some(RepoTarget::Code(code.clone())),
            (None, None) => None,
        }
    }

    /// Reconciliation policy for records that already exist downstream.
    pub fn existing_policy(&self) -> ExistingPolicy {
        if self.destination_skip_existing {
            ExistingPolicy::Skip
        } else {
            ExistingPolicy::Replace
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

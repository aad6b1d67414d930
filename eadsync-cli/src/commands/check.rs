//! `eadsync check` — verify both instances before a real run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use eadsync_client::Session;
use eadsync_core::job::SyncJob;
use eadsync_core::types::Role;

/// Arguments for `eadsync check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the sync job file (YAML or JSON).
    #[arg(long, value_name = "FILE")]
    pub job: PathBuf,
}

impl CheckArgs {
    /// Open both sessions and resolve both sub-repositories, writing
    /// nothing. The same failures that would abort a run fail the check.
    pub fn run(self) -> Result<()> {
        let job = SyncJob::load_at(&self.job)
            .with_context(|| format!("failed to load job file {}", self.job.display()))?;

        for role in [Role::Source, Role::Destination] {
            let session =
                Session::open(role, &job).with_context(|| format!("{role} verification failed"))?;
            let scope = session.repo_scope().unwrap_or_default();
            println!("✓ [{role}] {} (repositories/{scope})", session.base_url());
        }
        Ok(())
    }
}

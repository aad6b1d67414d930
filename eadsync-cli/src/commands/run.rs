//! `eadsync run` — execute the synchronization pipeline for a job file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use eadsync_client::Session;
use eadsync_core::job::SyncJob;
use eadsync_core::types::Role;
use eadsync_pipeline::migrate::{self, RecordOutcome, RunOptions, RunSummary};
use eadsync_pipeline::transform::Transforms;

use crate::IdGeneratorArg;

/// Arguments for `eadsync run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the sync job file (YAML or JSON).
    #[arg(long, value_name = "FILE")]
    pub job: PathBuf,

    /// Only consider records modified in the last day.
    #[arg(long)]
    pub recent_only: bool,

    /// Leave existing destination records alone instead of replacing them.
    #[arg(long)]
    pub skip_existing: bool,

    /// Identifier strategy used to match records across instances.
    #[arg(long, value_name = "STRATEGY")]
    pub id_generator: Option<IdGeneratorArg>,

    /// Restrict the run to a specific source record URI (repeatable).
    #[arg(long = "target-uri", value_name = "URI")]
    pub target_uris: Vec<String>,

    /// Convert everything but write nothing to the destination.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run summary as machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let mut job = SyncJob::load_at(&self.job)
            .with_context(|| format!("failed to load job file {}", self.job.display()))?;

        // CLI flags override the corresponding job fields.
        if self.recent_only {
            job.recent_only = true;
        }
        if self.skip_existing {
            job.destination_skip_existing = true;
        }
        if let Some(generator) = self.id_generator {
            job.id_generator = generator.into();
        }
        if !self.target_uris.is_empty() {
            job.source_target_record_uris = self.target_uris;
        }

        let mut source =
            Session::open(Role::Source, &job).context("source session failed")?;
        let mut destination =
            Session::open(Role::Destination, &job).context("destination session failed")?;

        let mut options = RunOptions::from_job(&job);
        options.dry_run = self.dry_run;

        let summary = migrate::run(
            &mut source,
            &mut destination,
            &options,
            &Transforms::default(),
        )
        .context("sync run aborted")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary, self.dry_run);
        }
        Ok(())
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    if summary.outcomes.is_empty() {
        println!("{prefix}✓ nothing to migrate ({} filtered)", summary.filtered);
        return;
    }

    let failed = summary.failed();
    let headline = format!(
        "{prefix}✓ sync complete ({} imported, {} replaced, {} skipped, {} failed, {} filtered)",
        summary.imported() + summary.would_import(),
        summary.replaced(),
        summary.skipped_existing(),
        failed,
        summary.filtered,
    );
    if failed > 0 {
        println!("{}", headline.yellow());
    } else {
        println!("{headline}");
    }

    for outcome in &summary.outcomes {
        match outcome {
            RecordOutcome::Imported { uri, .. } => println!("  ✎  {uri}"),
            RecordOutcome::Replaced {
                uri, replaced_ref, ..
            } => println!("  ↻  {uri} (replaced {replaced_ref})"),
            RecordOutcome::SkippedExisting { uri, .. } => println!("  ·  {uri}"),
            RecordOutcome::WouldImport { uri, .. } => println!("  ~  {uri}"),
            RecordOutcome::Failed { uri, step } => {
                println!("  {}  {uri} ({step})", "✗".red())
            }
        }
    }
}

//! eadsync — migrate archival description records between repository instances.
//!
//! # Usage
//!
//! ```text
//! eadsync run --job <file> [--recent-only] [--skip-existing]
//!             [--id-generator smushed|four_part] [--target-uri <uri>]...
//!             [--dry-run]
//! eadsync check --job <file>
//! ```
//!
//! The job file (YAML or JSON) names both instances, their credentials,
//! and the run parameters; CLI flags override the corresponding fields.

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, run::RunArgs};
use eadsync_core::types::IdGenerator;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "eadsync",
    version,
    about = "Copy modified archival description records from a source repository to a destination",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the record synchronization pipeline.
    Run(RunArgs),

    /// Verify that both sessions and sub-repositories resolve, then exit.
    Check(CheckArgs),
}

// ---------------------------------------------------------------------------
// Shared IdGenerator argument — parsed from CLI strings, converts to core type
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse `IdGenerator` from CLI args.
#[derive(Debug, Clone, Default)]
pub struct IdGeneratorArg(pub IdGenerator);

impl FromStr for IdGeneratorArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smushed" => Ok(Self(IdGenerator::Smushed)),
            "four_part" => Ok(Self(IdGenerator::FourPart)),
            other => Err(format!(
                "unknown id generator '{other}'; expected: smushed, four_part"
            )),
        }
    }
}

impl fmt::Display for IdGeneratorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<IdGeneratorArg> for IdGenerator {
    fn from(g: IdGeneratorArg) -> Self {
        g.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Check(args) => args.run(),
    }
}

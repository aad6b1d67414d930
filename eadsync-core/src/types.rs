//! Domain types shared across the eadsync workspace.
//!
//! Wire-facing structs deserialize with serde from the repository JSON API;
//! unknown fields are ignored so instance version drift does not break the
//! listing.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Roles and repository targets
// ---------------------------------------------------------------------------

/// Which side of the migration a session or config field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Source,
    Destination,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Source => write!(f, "source"),
            Role::Destination => write!(f, "destination"),
        }
    }
}

/// How a sub-repository is addressed in the job file.
///
/// A numeric id is verified directly; a code is resolved against the
/// instance's repository listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoTarget {
    Id(u32),
    Code(String),
}

impl fmt::Display for RepoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoTarget::Id(id) => write!(f, "repositories/{id}"),
            RepoTarget::Code(code) => write!(f, "repo_code {code}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Source records
// ---------------------------------------------------------------------------

/// A source-side archival description record, as returned by the
/// modified-record listing.
///
/// Only the fields the pipeline consumes are modeled; everything else in
/// the listing payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub uri: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub publish: bool,
    #[serde(default)]
    pub id_0: Option<String>,
    #[serde(default)]
    pub id_1: Option<String>,
    #[serde(default)]
    pub id_2: Option<String>,
    #[serde(default)]
    pub id_3: Option<String>,
}

impl Resource {
    /// The numeric record id — the last segment of the record URI.
    pub fn record_id(&self) -> &str {
        self.uri.rsplit('/').next().unwrap_or(&self.uri)
    }

    /// The four identifier components in order.
    pub fn id_parts(&self) -> [Option<&str>; 4] {
        [
            self.id_0.as_deref(),
            self.id_1.as_deref(),
            self.id_2.as_deref(),
            self.id_3.as_deref(),
        ]
    }
}

/// One page of the source modified-record listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourcePage {
    pub current_page: u32,
    pub last_page: u32,
    #[serde(default)]
    pub results: Vec<Resource>,
}

impl ResourcePage {
    /// Whether another page follows this one.
    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}

// ---------------------------------------------------------------------------
// Matching identifier
// ---------------------------------------------------------------------------

/// The serialized cross-system matching key.
///
/// This is the only correlation mechanism between source and destination
/// records, so the inner string is always the canonical compact JSON form
/// produced by the identifier resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchingIdentifier(pub String);

impl MatchingIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchingIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Run policies
// ---------------------------------------------------------------------------

/// Strategy for deriving the matching identifier from a record's
/// identifier components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdGenerator {
    /// Non-empty components joined with `.`, as a one-element sequence.
    #[default]
    Smushed,
    /// All four components as a four-element sequence; `id_0` required.
    FourPart,
}

impl fmt::Display for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdGenerator::Smushed => write!(f, "smushed"),
            IdGenerator::FourPart => write!(f, "four_part"),
        }
    }
}

/// What to do when the destination already holds a matching record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingPolicy {
    /// Delete the destination copy and reimport (the destination cannot
    /// overlay in place).
    #[default]
    Replace,
    /// Leave both sides untouched this run.
    Skip,
}

impl fmt::Display for ExistingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExistingPolicy::Replace => write!(f, "replace"),
            ExistingPolicy::Skip => write!(f, "skip"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

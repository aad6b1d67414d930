//! eadsync core library — domain types, job configuration, repository
//! interfaces, errors.
//!
//! Public API surface:
//! - [`types`] — records, identifiers, run policies
//! - [`job`] — [`SyncJob`] load / validate
//! - [`repo`] — [`SourceRepository`] / [`DestinationRepository`]
//! - [`error`] — [`JobError`] / [`ApiError`]

pub mod error;
pub mod job;
pub mod repo;
pub mod types;

pub use error::{ApiError, JobError};
pub use job::SyncJob;
pub use repo::{DestinationRepository, SourceRepository};
pub use types::{
    ExistingPolicy, IdGenerator, MatchingIdentifier, RepoTarget, Resource, ResourcePage, Role,
};

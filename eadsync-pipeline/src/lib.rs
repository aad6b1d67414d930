//! # eadsync-pipeline
//!
//! The record synchronization pipeline: modification window, identifier
//! derivation, payload transformation, EAD fetch normalization, and the
//! per-record orchestration loop.
//!
//! Call [`migrate::run`] with a [`SourceRepository`] and
//! [`DestinationRepository`] (HTTP sessions in production, fakes in tests)
//! and the run's [`RunOptions`].

pub mod error;
pub mod fetch;
pub mod identifier;
pub mod migrate;
pub mod transform;
pub mod window;

pub use error::{NormalizeError, SyncError};
pub use identifier::IdentifierError;
pub use migrate::{RecordOutcome, RunOptions, RunSummary, Step};
pub use transform::{Stage, Transforms};

#[doc(no_inline)]
pub use eadsync_core::repo::{DestinationRepository, SourceRepository};

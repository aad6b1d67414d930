//! Error types for eadsync-client.

use thiserror::Error;

use eadsync_core::error::ApiError;
use eadsync_core::types::{RepoTarget, Role};

/// Session startup and request errors.
///
/// `InvalidRepository` is fatal by construction: it is raised from
/// [`crate::Session::open`], before any record is processed, and aborting
/// there is the only safe outcome — continuing without a resolved
/// sub-repository scope would misdirect every subsequent write.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Authentication against the instance failed.
    #[error("[{role}] login failed for user {username}: {source}")]
    Login {
        role: Role,
        username: String,
        #[source]
        source: ApiError,
    },

    /// The configured sub-repository does not exist on the instance.
    #[error("[{role}] invalid repository: {target}")]
    InvalidRepository { role: Role, target: RepoTarget },

    /// Any other API failure during session setup.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

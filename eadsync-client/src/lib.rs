//! # eadsync-client
//!
//! Blocking HTTP implementation of the repository interfaces.
//!
//! [`Session::open`] authenticates against one instance and pins the
//! session to a resolved sub-repository; the [`SourceRepository`] and
//! [`DestinationRepository`] impls in [`api`] carry the pipeline's calls
//! over the wire.

pub mod api;
pub mod error;
pub mod session;

pub use error::ClientError;
pub use session::{ScopeGuard, Session};

#[doc(no_inline)]
pub use eadsync_core::repo::{DestinationRepository, SourceRepository};

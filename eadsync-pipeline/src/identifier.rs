//! Cross-system matching identifier derivation.
//!
//! The two instances share no primary key, so the only handle for finding a
//! prior destination copy is a key derived from the record's identifier
//! components. The serialized form (compact JSON, stable ordering) is what
//! gets compared and sent to the destination's lookup endpoint, so the same
//! inputs must always produce byte-identical output.

use thiserror::Error;

use eadsync_core::types::{IdGenerator, MatchingIdentifier, Resource};

/// Errors from identifier derivation. Per-record, never fatal to the run.
#[derive(Debug, Error)]
pub enum IdentifierError {
    /// `four_part` requires the primary component.
    #[error("record {uri} has no id_0 component")]
    MissingPrimaryComponent { uri: String },

    #[error("identifier serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Derive the matching identifier for a record under the given strategy.
///
/// - `smushed`: the non-empty components in order, joined with `.`, as a
///   one-element sequence — `["A.C"]`.
/// - `four_part`: all four components with `null` for absent ones —
///   `["A",null,"C",null]`; `id_0` is required.
pub fn resolve(
    resource: &Resource,
    strategy: IdGenerator,
) -> Result<MatchingIdentifier, IdentifierError> {
    let parts = resource.id_parts();
    let serialized = match strategy {
        IdGenerator::Smushed => {
            let joined = parts.iter().flatten().copied().collect::<Vec<_>>().join(".");
            serde_json::to_string(&[joined])?
        }
        IdGenerator::FourPart => {
            if parts[0].is_none() {
                return Err(IdentifierError::MissingPrimaryComponent {
                    uri: resource.uri.clone(),
                });
            }
            serde_json::to_string(&parts)?
        }
    };
    Ok(MatchingIdentifier(serialized))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

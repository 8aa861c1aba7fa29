//! Domain error model.

use thiserror::Error;

use crate::schema::ValidationErrors;

/// Domain-level error.
///
/// Deterministic failures only (bad payloads, bad identifiers). Storage and
/// transport failures are modelled by the crates that own them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A payload failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// An identifier could not be parsed into the store's key type.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

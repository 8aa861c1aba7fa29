use thiserror::Error;

use crudkit_core::{DomainError, ValidationErrors};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a [`crate::RecordStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The merged document failed schema validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The identifier is not in the store's key format.
    #[error("{0}")]
    InvalidId(String),

    /// The backend could not complete the operation (connection, lock, SQL).
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// A persisted document no longer matches its schema.
    #[error("stored document is corrupt: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(v) => Self::Validation(v),
            DomainError::InvalidId(msg) => Self::InvalidId(msg),
        }
    }
}

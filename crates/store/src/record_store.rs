use serde_json::Value;

use crudkit_core::{Record, RecordId, Schema};

use crate::error::{StoreError, StoreResult};

/// Collection-scoped document store for records of kind `T`.
///
/// Identifiers arrive as raw path text: parsing them is the store's job, so
/// a malformed id is a store failure rather than a lookup miss.
#[async_trait::async_trait]
pub trait RecordStore<T: Schema>: Send + Sync {
    /// Persist validated fields under a fresh identity.
    async fn create(&self, fields: T) -> StoreResult<Record<T>>;

    /// All records in the store's natural order (creation order here).
    async fn find(&self) -> StoreResult<Vec<Record<T>>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Record<T>>>;

    /// Merge `patch` over the stored fields, re-validate, and write.
    ///
    /// Atomic per record: on a validation error the stored record is left
    /// as it was. Returns the updated record, or `None` if absent.
    async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: &Value,
    ) -> StoreResult<Option<Record<T>>>;

    /// Remove and return the record, or `None` if absent.
    async fn find_by_id_and_delete(&self, id: &str) -> StoreResult<Option<Record<T>>>;
}

pub(crate) fn parse_id(id: &str) -> StoreResult<RecordId> {
    id.parse::<RecordId>().map_err(StoreError::from)
}

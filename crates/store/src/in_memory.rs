use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use serde_json::Value;

use crudkit_core::{Record, RecordId, Schema};

use crate::error::{StoreError, StoreResult};
use crate::record_store::{RecordStore, parse_id};

/// In-memory document store for tests/dev.
///
/// Records are keyed by id and tagged with an insertion sequence so `find`
/// returns them in creation order.
#[derive(Debug)]
pub struct InMemoryStore<T> {
    inner: RwLock<Collection<T>>,
}

#[derive(Debug)]
struct Collection<T> {
    next_seq: u64,
    records: HashMap<RecordId, (u64, Record<T>)>,
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collection {
                next_seq: 0,
                records: HashMap::new(),
            }),
        }
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E>(_: E) -> StoreError {
    StoreError::backend("in-memory collection lock poisoned")
}

#[async_trait::async_trait]
impl<T: Schema> RecordStore<T> for InMemoryStore<T> {
    async fn create(&self, fields: T) -> StoreResult<Record<T>> {
        let record = Record::new(fields, Utc::now());
        let mut coll = self.inner.write().map_err(poisoned)?;
        let seq = coll.next_seq;
        coll.next_seq += 1;
        coll.records.insert(record.id, (seq, record.clone()));
        tracing::debug!(collection = T::COLLECTION, id = %record.id, "record inserted");
        Ok(record)
    }

    async fn find(&self) -> StoreResult<Vec<Record<T>>> {
        let coll = self.inner.read().map_err(poisoned)?;
        let mut rows: Vec<_> = coll.records.values().collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, r)| r.clone()).collect())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Record<T>>> {
        let id = parse_id(id)?;
        let coll = self.inner.read().map_err(poisoned)?;
        Ok(coll.records.get(&id).map(|(_, r)| r.clone()))
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: &Value,
    ) -> StoreResult<Option<Record<T>>> {
        let id = parse_id(id)?;
        let mut coll = self.inner.write().map_err(poisoned)?;
        let Some((_, current)) = coll.records.get_mut(&id) else {
            return Ok(None);
        };

        let fields = current.fields.apply_patch(patch)?;
        let updated = current.clone().revise(fields, Utc::now());
        *current = updated.clone();
        tracing::debug!(collection = T::COLLECTION, id = %id, "record updated");
        Ok(Some(updated))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> StoreResult<Option<Record<T>>> {
        let id = parse_id(id)?;
        let mut coll = self.inner.write().map_err(poisoned)?;
        let removed = coll.records.remove(&id).map(|(_, r)| r);
        if removed.is_some() {
            tracing::debug!(collection = T::COLLECTION, id = %id, "record deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudkit_records::Student;
    use serde_json::json;

    fn alice() -> Student {
        Student::validate(&json!({ "name": "Alice", "age": 20, "course": "CS" })).unwrap()
    }

    #[tokio::test]
    async fn created_record_is_found_by_id() {
        let store = InMemoryStore::<Student>::new();
        let created = store.create(alice()).await.unwrap();

        let found = store
            .find_by_id(&created.id.to_string())
            .await
            .unwrap()
            .expect("record should exist");
        assert_eq!(found, created);
        assert_eq!(found.created_at, found.updated_at);
    }

    #[tokio::test]
    async fn find_returns_records_in_creation_order() {
        let store = InMemoryStore::<Student>::new();
        let mut ids = Vec::new();
        for name in ["A", "B", "C", "D"] {
            let mut s = alice();
            s.name = name.to_string();
            ids.push(store.create(s).await.unwrap().id);
        }

        let listed: Vec<_> = store.find().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn unknown_id_is_absent_for_every_lookup() {
        let store = InMemoryStore::<Student>::new();
        let id = RecordId::new().to_string();

        assert!(store.find_by_id(&id).await.unwrap().is_none());
        assert!(store
            .find_by_id_and_update(&id, &json!({ "age": 1 }))
            .await
            .unwrap()
            .is_none());
        assert!(store.find_by_id_and_delete(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_id_is_a_store_error() {
        let store = InMemoryStore::<Student>::new();
        let err = store.find_by_id("123").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }

    #[tokio::test]
    async fn update_merges_fields_and_bumps_updated_at() {
        let store = InMemoryStore::<Student>::new();
        let created = store.create(alice()).await.unwrap();

        let updated = store
            .find_by_id_and_update(&created.id.to_string(), &json!({ "age": 21 }))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.fields.age, 21.0);
        assert_eq!(updated.fields.name, "Alice");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn invalid_update_leaves_record_unchanged() {
        let store = InMemoryStore::<Student>::new();
        let created = store.create(alice()).await.unwrap();
        let id = created.id.to_string();

        let err = store
            .find_by_id_and_update(&id, &json!({ "name": "", "age": "x" }))
            .await
            .unwrap_err();
        match err {
            StoreError::Validation(v) => assert_eq!(v.errors().len(), 2),
            other => panic!("expected Validation, got {other:?}"),
        }

        let stored = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn delete_is_not_repeatable() {
        let store = InMemoryStore::<Student>::new();
        let created = store.create(alice()).await.unwrap();
        let id = created.id.to_string();

        assert_eq!(store.find_by_id_and_delete(&id).await.unwrap(), Some(created));
        assert_eq!(store.find_by_id_and_delete(&id).await.unwrap(), None);
        assert!(store.find().await.unwrap().is_empty());
    }
}

//! Postgres document store against a live database.
//!
//! Runs only with `--features postgres` and `DATABASE_URL` set; otherwise
//! every test returns early.
#![cfg(feature = "postgres")]

use std::sync::Arc;

use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::OnceCell;

use crudkit_core::{RecordId, Schema};
use crudkit_records::{Product, Student};
use crudkit_store::postgres::ensure_schema;
use crudkit_store::{PostgresStore, RecordStore, StoreError};

static SCHEMA: OnceCell<()> = OnceCell::const_new();

async fn store<T: Schema>() -> Option<PostgresStore<T>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping Postgres store test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect to DATABASE_URL");
    SCHEMA
        .get_or_try_init(|| ensure_schema(&pool))
        .await
        .expect("failed to create documents table");

    Some(PostgresStore::new(Arc::new(pool)))
}

fn student(name: &str, age: u32, course: &str) -> Student {
    Student::validate(&json!({ "name": name, "age": age, "course": course })).unwrap()
}

#[tokio::test]
async fn created_and_updated_records_read_back_identically() {
    let Some(store) = store::<Student>().await else {
        return;
    };

    let created = store.create(student("Alice", 20, "CS")).await.unwrap();
    let id = created.id.to_string();

    let fetched = store.find_by_id(&id).await.unwrap();
    assert_eq!(fetched.as_ref(), Some(&created));

    let updated = store
        .find_by_id_and_update(&id, &json!({ "age": 21 }))
        .await
        .unwrap()
        .expect("record exists");
    assert_eq!(updated.fields.age, 21.0);
    assert_eq!(updated.fields.name, "Alice");
    assert_eq!(updated.created_at, created.created_at);

    let fetched = store.find_by_id(&id).await.unwrap();
    assert_eq!(fetched, Some(updated));
}

#[tokio::test]
async fn deleting_twice_finds_nothing_the_second_time() {
    let Some(store) = store::<Student>().await else {
        return;
    };

    let created = store.create(student("Cara", 19, "Math")).await.unwrap();
    let id = created.id.to_string();

    let removed = store.find_by_id_and_delete(&id).await.unwrap();
    assert_eq!(removed, Some(created));

    assert_eq!(store.find_by_id_and_delete(&id).await.unwrap(), None);
    assert_eq!(store.find_by_id(&id).await.unwrap(), None);
}

#[tokio::test]
async fn invalid_update_rolls_back_and_releases_the_row() {
    let Some(store) = store::<Student>().await else {
        return;
    };

    let created = store.create(student("Dan", 22, "Physics")).await.unwrap();
    let id = created.id.to_string();

    let err = store
        .find_by_id_and_update(&id, &json!({ "age": "twenty", "name": null }))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.find_by_id(&id).await.unwrap(), Some(created));

    // The row lock from the failed attempt is gone.
    let updated = store
        .find_by_id_and_update(&id, &json!({ "course": "Chemistry" }))
        .await
        .unwrap()
        .expect("record exists");
    assert_eq!(updated.fields.course, "Chemistry");
}

#[tokio::test]
async fn find_lists_records_in_creation_order() {
    let Some(store) = store::<Student>().await else {
        return;
    };

    let mut ids = Vec::new();
    for name in ["first", "second", "third"] {
        ids.push(store.create(student(name, 30, "Order")).await.unwrap().id);
    }

    let listed: Vec<RecordId> = store
        .find()
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .filter(|id| ids.contains(id))
        .collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let Some(store) = store::<Student>().await else {
        return;
    };

    let unknown = RecordId::new().to_string();
    assert_eq!(store.find_by_id(&unknown).await.unwrap(), None);
    assert_eq!(
        store
            .find_by_id_and_update(&unknown, &json!({ "age": 1 }))
            .await
            .unwrap(),
        None
    );

    let err = store.find_by_id("123").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidId(_)));
}

#[tokio::test]
async fn collections_do_not_share_records() {
    let (Some(products), Some(students)) = (store::<Product>().await, store::<Student>().await)
    else {
        return;
    };

    let widget = Product::validate(&json!({ "name": "Widget", "price": 9.5 })).unwrap();
    let created = products.create(widget).await.unwrap();
    let id = created.id.to_string();

    assert_eq!(students.find_by_id(&id).await.unwrap(), None);
    assert_eq!(students.find_by_id_and_delete(&id).await.unwrap(), None);
    assert_eq!(products.find_by_id(&id).await.unwrap(), Some(created));
}

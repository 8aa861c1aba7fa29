//! Generic CRUD handler set, instantiated once per record kind.
//!
//! Each handler is a thin adapter: extract, make exactly one store call,
//! map the outcome to a status code and JSON body.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;

use crudkit_core::Schema;
use crudkit_store::RecordStore;

use crate::app::errors;

type Store<T> = Arc<dyn RecordStore<T>>;

/// `POST /` `GET /` `GET /:id` `PUT /:id` `DELETE /:id` over `store`.
pub fn router<T: Schema>(store: Store<T>) -> Router {
    Router::new()
        .route("/", post(create::<T>).get(list::<T>))
        .route(
            "/:id",
            get(get_by_id::<T>).put(update::<T>).delete(delete::<T>),
        )
        .layer(Extension(store))
}

pub async fn create<T: Schema>(
    Extension(store): Extension<Store<T>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::body_rejection_to_response(rejection),
    };

    let fields = match T::validate(&payload) {
        Ok(fields) => fields,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match store.create(fields).await {
        Ok(record) => {
            tracing::info!(kind = T::KIND, id = %record.id, "record created");
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => errors::store_error_to_response(T::KIND, e),
    }
}

pub async fn list<T: Schema>(Extension(store): Extension<Store<T>>) -> Response {
    match store.find().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => errors::store_error_to_response(T::KIND, e),
    }
}

pub async fn get_by_id<T: Schema>(
    Extension(store): Extension<Store<T>>,
    Path(id): Path<String>,
) -> Response {
    match store.find_by_id(&id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => errors::not_found(T::KIND),
        Err(e) => errors::store_error_to_response(T::KIND, e),
    }
}

pub async fn update<T: Schema>(
    Extension(store): Extension<Store<T>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(patch) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::body_rejection_to_response(rejection),
    };

    match store.find_by_id_and_update(&id, &patch).await {
        Ok(Some(record)) => {
            tracing::info!(kind = T::KIND, id = %record.id, "record updated");
            (StatusCode::OK, Json(record)).into_response()
        }
        Ok(None) => errors::not_found(T::KIND),
        Err(e) => errors::store_error_to_response(T::KIND, e),
    }
}

pub async fn delete<T: Schema>(
    Extension(store): Extension<Store<T>>,
    Path(id): Path<String>,
) -> Response {
    match store.find_by_id_and_delete(&id).await {
        Ok(Some(record)) => {
            tracing::info!(kind = T::KIND, id = %record.id, "record deleted");
            errors::json_message(StatusCode::OK, format!("{} deleted successfully", T::KIND))
        }
        Ok(None) => errors::not_found(T::KIND),
        Err(e) => errors::store_error_to_response(T::KIND, e),
    }
}

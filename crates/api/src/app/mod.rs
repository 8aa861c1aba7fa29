//! HTTP API application wiring (Axum router + store wiring).
//!
//! - `services.rs`: store construction and the per-resource store handles
//! - `routes/`: route table and the generic CRUD handler set
//! - `errors.rs`: consistent JSON error responses

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(&services))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

use axum::Router;

use crate::app::services::AppServices;

pub mod resource;
pub mod system;

/// Mount point of the student handler set.
pub const STUDENTS_PATH: &str = "/api/students";

/// Mount point of the product handler set.
pub const PRODUCTS_PATH: &str = "/products";

/// Route table: one generic handler set per resource.
pub fn router(services: &AppServices) -> Router {
    Router::new()
        .nest(STUDENTS_PATH, resource::router(services.students.clone()))
        .nest(PRODUCTS_PATH, resource::router(services.products.clone()))
}

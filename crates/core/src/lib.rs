//! `crudkit-core` — record building blocks shared by every resource.
//!
//! This crate contains **pure domain** primitives (no HTTP, no storage):
//! identifiers, the record envelope, and schema-driven payload validation.

pub mod error;
pub mod id;
pub mod number;
pub mod record;
pub mod schema;

pub use error::DomainError;
pub use id::RecordId;
pub use record::Record;
pub use schema::{Document, FieldError, FieldKind, FieldSpec, Schema, ValidationErrors};

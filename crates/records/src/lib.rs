//! Record kinds served by the API.
//!
//! Each kind is a typed struct plus its field table; validation and
//! persistence are generic over [`crudkit_core::Schema`].

pub mod product;
pub mod student;

pub use product::Product;
pub use student::Student;

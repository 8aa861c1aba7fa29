//! Document storage: the `RecordStore` capability and its backends.

pub mod error;
pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod record_store;

pub use error::{StoreError, StoreResult};
pub use in_memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
pub use record_store::RecordStore;

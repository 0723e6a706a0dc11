//! Professor storage and owner lookup.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use r#trait::{ProfessorStore, StoreError, UserDirectory};

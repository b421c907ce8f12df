pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod schema;
pub mod store;

pub use error::DatabaseError;
pub use memory::MemoryStore;
pub use pg::{get_database_connection, DatabasePool, PgStore};
pub use store::{AllocationStore, AllocationWriter, PreferenceReader};

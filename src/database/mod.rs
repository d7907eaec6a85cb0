pub mod manager;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

pub use manager::{Backend, DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{EntityRef, Store, StoreResult};

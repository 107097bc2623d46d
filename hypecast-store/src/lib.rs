pub mod app_config;
pub mod database;
pub mod memory;
pub mod postgres;

pub use app_config::{Config, EngineConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

//! SQLite adapters for the scheduling store.

pub mod connection;
pub mod migrations;
pub mod scheduling_repository;

pub use connection::{create_pool, ConnectionError, PoolConfig};
pub use migrations::{Migration, MigrationError, Migrator};
pub use scheduling_repository::SqliteSchedulingRepository;

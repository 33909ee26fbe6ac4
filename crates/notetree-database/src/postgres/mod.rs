//! PostgreSQL row gateway, connection pool, and migrations.

pub mod connection;
pub mod gateway;
pub mod migration;

pub use connection::{DatabasePool, mask_password};
pub use gateway::PgGateway;
pub use migration::PendingMigration;

//! # notetree-database
//!
//! Row gateway backends for NoteTree and the repositories that translate
//! folder operations into gateway calls.
//!
//! - [`memory::MemoryGateway`]: process-local tables, used by tests and
//!   embedded callers.
//! - [`postgres::PgGateway`]: PostgreSQL via sqlx.

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod repositories;

#[cfg(feature = "memory")]
pub use memory::MemoryGateway;
#[cfg(feature = "postgres")]
pub use postgres::{DatabasePool, PgGateway};

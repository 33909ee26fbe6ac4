//! In-memory row gateway.

pub mod store;

pub use store::MemoryGateway;

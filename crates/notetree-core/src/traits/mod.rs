//! Core traits defined in `notetree-core` and implemented by other crates.

pub mod gateway;

pub use gateway::{Row, RowGateway};

//! # notetree-core
//!
//! Core crate for NoteTree. Contains the persistence gateway trait,
//! configuration schemas, typed identifiers, filter/sorting types,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other NoteTree crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

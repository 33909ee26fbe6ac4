//! Core type definitions used across the NoteTree workspace.

pub mod filter;
pub mod id;
pub mod sorting;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use id::*;
pub use sorting::{SortDirection, SortField};

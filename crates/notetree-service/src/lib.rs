//! # notetree-service
//!
//! The folder hierarchy engine. [`FolderService`] is the facade callers use;
//! it orchestrates the tree builder, level resolver, descendant finder,
//! cycle guard, and cascade executor over the folder and note repositories.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references, so any
//! [`RowGateway`](notetree_core::traits::RowGateway) can back them.

pub mod folder;

pub use folder::{DeletePreview, FolderService};

//! Folder hierarchy services.

pub mod cascade;
pub mod descendants;
pub mod guard;
pub mod level;
pub mod service;
pub mod tree;

pub use cascade::{CascadeExecutor, DeleteReport};
pub use descendants::{DescendantFinder, Subtree};
pub use guard::CycleGuard;
pub use level::LevelResolver;
pub use service::{DeletePreview, FolderService};
pub use tree::{build_tree, expected_levels};

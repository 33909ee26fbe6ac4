//! Folder domain entities.

pub mod model;
pub mod patch;
pub mod tree;

pub use model::{CreateFolder, Folder, FOLDERS_TABLE};
pub use patch::FolderPatch;
pub use tree::FolderNode;

//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use notetree_core::types::FolderId;

use super::model::Folder;

/// A node in a folder tree: the folder row plus its ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// The folder row.
    #[serde(flatten)]
    pub folder: Folder,
    /// Child folder nodes. Empty, never absent, when childless.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Create a node with no children.
    pub fn leaf(folder: Folder) -> Self {
        Self {
            folder,
            children: Vec::new(),
        }
    }

    /// Folder ID.
    pub fn id(&self) -> FolderId {
        self.folder.id
    }

    /// Folder name.
    pub fn name(&self) -> &str {
        &self.folder.name
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(&node.children);
        }
        count
    }

    /// Depth-first search for a node by ID, visiting children in order.
    pub fn find(&self, id: FolderId) -> Option<&FolderNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.folder.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }
}

/// Tears the subtree down level by level instead of through nested drop glue.
impl Drop for FolderNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

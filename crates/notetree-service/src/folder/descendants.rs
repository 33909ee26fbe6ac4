//! Descendant discovery, one gateway query per tree level.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use notetree_core::config::HierarchyConfig;
use notetree_core::error::AppError;
use notetree_core::result::AppResult;
use notetree_core::types::FolderId;
use notetree_database::repositories::FolderRepository;

/// Everything below a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subtree {
    /// Descendant IDs. Never contains the root folder on well-formed data.
    pub ids: HashSet<FolderId>,
    /// Number of levels below the root folder (`0` when childless).
    pub height: u32,
}

impl Subtree {
    /// Whether `id` is somewhere below the root folder.
    pub fn contains(&self, id: FolderId) -> bool {
        self.ids.contains(&id)
    }
}

/// Walks the parent relation downward, frontier by frontier.
///
/// The walk has no cycle detection. On corrupted cyclic data it stops only
/// because the number of levels is capped by `max_depth`, failing with
/// `TooDeep`.
#[derive(Debug, Clone)]
pub struct DescendantFinder {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Maximum number of levels one walk may visit.
    max_depth: u32,
}

impl DescendantFinder {
    /// Creates a new descendant finder.
    pub fn new(folder_repo: Arc<FolderRepository>, config: HierarchyConfig) -> Self {
        Self {
            folder_repo,
            max_depth: config.max_depth,
        }
    }

    /// IDs of every folder below `folder_id`. Empty for a leaf or a missing
    /// folder.
    pub async fn find_all_descendant_ids(
        &self,
        folder_id: FolderId,
    ) -> AppResult<HashSet<FolderId>> {
        Ok(self.collect(folder_id).await?.ids)
    }

    /// Descendant IDs of `folder_id` together with the subtree height.
    pub async fn collect(&self, folder_id: FolderId) -> AppResult<Subtree> {
        let mut subtree = Subtree::default();
        let mut frontier = vec![folder_id];

        loop {
            let children = self.folder_repo.find_child_ids(&frontier).await?;
            if children.is_empty() {
                break;
            }

            subtree.height += 1;
            if subtree.height > self.max_depth {
                return Err(AppError::too_deep(format!(
                    "Folder {folder_id} has more than {} levels below it",
                    self.max_depth
                )));
            }

            debug!(
                folder_id = %folder_id,
                depth = subtree.height,
                count = children.len(),
                "Visited descendant frontier"
            );
            subtree.ids.extend(children.iter().copied());
            frontier = children;
        }

        Ok(subtree)
    }
}

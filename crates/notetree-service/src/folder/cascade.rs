//! Multi-step subtree mutations: cascading delete and level-propagating move.
//!
//! Neither operation is transactional. Each gateway call either completes or
//! fails on its own, and the order of calls is chosen so that every partial
//! state left behind by a failure is recoverable by retrying:
//!
//! - `remove` deletes notes before folders, so a failure never leaves notes
//!   pointing at deleted folders.
//! - `move_folder` validates everything before its first write. A failure
//!   while propagating levels leaves correct topology with stale cached
//!   levels, which a later move or `repair_levels` fixes.

use std::sync::Arc;

use tracing::{debug, warn};

use notetree_core::config::HierarchyConfig;
use notetree_core::error::AppError;
use notetree_core::result::AppResult;
use notetree_core::types::FolderId;
use notetree_database::repositories::{FolderRepository, NoteRepository};
use notetree_entity::folder::FolderPatch;

use super::descendants::DescendantFinder;
use super::guard::CycleGuard;
use super::level::LevelResolver;

/// Outcome of a cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Folder rows deleted.
    pub folders_deleted: u64,
    /// Note rows deleted.
    pub notes_deleted: u64,
}

/// Executes deletes and moves across a whole subtree.
#[derive(Debug, Clone)]
pub struct CascadeExecutor {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Note repository.
    note_repo: Arc<NoteRepository>,
    /// Descendant finder.
    finder: DescendantFinder,
    /// Cycle guard.
    guard: CycleGuard,
    /// Level resolver.
    resolver: LevelResolver,
    /// Deepest level a folder may have.
    max_depth: u32,
}

impl CascadeExecutor {
    /// Creates a new cascade executor.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        note_repo: Arc<NoteRepository>,
        config: HierarchyConfig,
    ) -> Self {
        let finder = DescendantFinder::new(folder_repo.clone(), config);
        Self {
            guard: CycleGuard::new(finder.clone()),
            resolver: LevelResolver::new(folder_repo.clone(), config),
            finder,
            folder_repo,
            note_repo,
            max_depth: config.max_depth,
        }
    }

    /// Deletes a folder, every folder below it, and every note filed in any
    /// of them.
    ///
    /// Removing a folder that no longer exists deletes nothing and succeeds.
    pub async fn remove(&self, folder_id: FolderId) -> AppResult<DeleteReport> {
        let mut ids = vec![folder_id];
        ids.extend(self.finder.find_all_descendant_ids(folder_id).await?);

        let notes_deleted = self.note_repo.delete_by_folders(&ids).await?;

        let folders_deleted = match self.folder_repo.delete_many(&ids).await {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    folder_id = %folder_id,
                    notes_deleted,
                    error = %e,
                    "Notes removed but folder subtree delete failed"
                );
                return Err(e);
            }
        };

        Ok(DeleteReport {
            folders_deleted,
            notes_deleted,
        })
    }

    /// Moves a folder under `new_parent_id` (or to the root) and rewrites
    /// the cached level of the folder and all of its descendants.
    ///
    /// Returns the folder's new level. Fails before any write with
    /// `NotFound`, `InvalidOperation`, or `TooDeep`.
    pub async fn move_folder(
        &self,
        folder_id: FolderId,
        new_parent_id: Option<FolderId>,
    ) -> AppResult<u32> {
        self.folder_repo.get(folder_id).await?;

        let subtree = self.guard.assert_safe_reparent(folder_id, new_parent_id).await?;
        let new_level = self.resolver.resolve_level(new_parent_id).await?;
        if new_level + subtree.height > self.max_depth {
            return Err(AppError::too_deep(format!(
                "Moving folder {folder_id} to level {new_level} would put its deepest \
                 descendant below the maximum depth of {}",
                self.max_depth
            )));
        }

        let updated = self
            .folder_repo
            .update(folder_id, FolderPatch::reparent(new_parent_id, new_level))
            .await?;
        if updated == 0 {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        self.propagate_levels(folder_id, new_level).await?;
        Ok(new_level)
    }

    /// Rewrites levels below `folder_id`: one read then one bulk update per
    /// tree level, stopping at the first level with no children.
    async fn propagate_levels(&self, folder_id: FolderId, level: u32) -> AppResult<()> {
        let mut frontier = vec![folder_id];
        let mut child_level = level + 1;

        loop {
            let children = self.folder_repo.find_child_ids(&frontier).await?;
            if children.is_empty() {
                return Ok(());
            }
            if child_level > self.max_depth {
                return Err(AppError::too_deep(format!(
                    "Level propagation below folder {folder_id} exceeded the maximum depth of {}",
                    self.max_depth
                )));
            }

            let updated = self
                .folder_repo
                .set_children_level(&frontier, child_level)
                .await?;
            debug!(
                folder_id = %folder_id,
                level = child_level,
                updated,
                "Propagated folder level"
            );

            frontier = children;
            child_level += 1;
        }
    }
}

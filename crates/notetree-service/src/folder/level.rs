//! Level resolution for new and moved folders.

use std::sync::Arc;

use notetree_core::config::HierarchyConfig;
use notetree_core::error::{AppError, ErrorKind};
use notetree_core::result::AppResult;
use notetree_core::types::FolderId;
use notetree_database::repositories::FolderRepository;

/// Computes the level a folder takes under a given parent.
#[derive(Debug, Clone)]
pub struct LevelResolver {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Deepest level a folder may have.
    max_depth: u32,
}

impl LevelResolver {
    /// Creates a new level resolver.
    pub fn new(folder_repo: Arc<FolderRepository>, config: HierarchyConfig) -> Self {
        Self {
            folder_repo,
            max_depth: config.max_depth,
        }
    }

    /// Level of a child of `parent_id`: `0` for a root, otherwise the
    /// parent's current level plus one.
    ///
    /// Fails with `NotFound` when the parent does not exist and `TooDeep`
    /// when the result would exceed the configured maximum depth. Nothing is
    /// written.
    pub async fn resolve_level(&self, parent_id: Option<FolderId>) -> AppResult<u32> {
        let Some(parent_id) = parent_id else {
            return Ok(0);
        };

        let parent = self.folder_repo.get(parent_id).await.map_err(|e| {
            if e.is(ErrorKind::NotFound) {
                AppError::not_found(format!("Parent folder {parent_id} not found"))
            } else {
                e
            }
        })?;

        let level = parent.level + 1;
        if level > self.max_depth {
            return Err(AppError::too_deep(format!(
                "Folder level {level} exceeds the maximum depth of {}",
                self.max_depth
            )));
        }
        Ok(level)
    }
}

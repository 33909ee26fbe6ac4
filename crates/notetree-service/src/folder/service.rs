//! Folder hierarchy operations.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use notetree_core::config::HierarchyConfig;
use notetree_core::error::AppError;
use notetree_core::result::AppResult;
use notetree_core::traits::RowGateway;
use notetree_core::types::FolderId;
use notetree_database::repositories::{FolderRepository, NoteRepository};
use notetree_entity::folder::{CreateFolder, Folder, FolderNode, FolderPatch};

use super::cascade::CascadeExecutor;
use super::descendants::DescendantFinder;
use super::level::LevelResolver;
use super::tree::{build_tree, expected_levels};

/// What a cascading delete of a folder would remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePreview {
    /// The folder itself followed by its descendants.
    pub folder_ids: Vec<FolderId>,
    /// Notes filed in any of those folders.
    pub note_count: usize,
}

/// Manages the folder hierarchy.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Note repository.
    note_repo: Arc<NoteRepository>,
    /// Level resolver.
    resolver: LevelResolver,
    /// Descendant finder.
    finder: DescendantFinder,
    /// Cascade executor.
    cascade: CascadeExecutor,
    /// Hierarchy limits.
    config: HierarchyConfig,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        note_repo: Arc<NoteRepository>,
        config: HierarchyConfig,
    ) -> Self {
        Self {
            resolver: LevelResolver::new(folder_repo.clone(), config),
            finder: DescendantFinder::new(folder_repo.clone(), config),
            cascade: CascadeExecutor::new(folder_repo.clone(), note_repo.clone(), config),
            folder_repo,
            note_repo,
            config,
        }
    }

    /// Creates a folder service whose repositories share one gateway.
    pub fn from_gateway(gateway: Arc<dyn RowGateway>, config: HierarchyConfig) -> Self {
        Self::new(
            Arc::new(FolderRepository::new(gateway.clone())),
            Arc::new(NoteRepository::new(gateway)),
            config,
        )
    }

    /// Fetches every folder and assembles the forest of root trees.
    pub async fn fetch_all_folders(&self) -> AppResult<Vec<FolderNode>> {
        let rows = self.folder_repo.find_all().await?;
        let total = rows.len();

        let tree = build_tree(rows);
        let placed: usize = tree.iter().map(FolderNode::count).sum();
        if placed < total {
            warn!(
                dropped = total - placed,
                "Folders with a missing parent were left out of the tree"
            );
        }
        Ok(tree)
    }

    /// Lists every folder row, level ascending then newest first.
    pub async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        self.folder_repo.find_all().await
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: FolderId) -> AppResult<Folder> {
        self.folder_repo.get(folder_id).await
    }

    /// Creates a new folder under `parent_id`, or a root folder.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> AppResult<Folder> {
        let name = validate_name(name)?;
        let level = self.resolver.resolve_level(parent_id).await?;

        let folder = self
            .folder_repo
            .create(CreateFolder {
                parent_id,
                name,
                level,
            })
            .await?;

        info!(
            folder_id = %folder.id,
            parent_id = ?folder.parent_id.map(|id| id.to_string()),
            level = folder.level,
            "Folder created"
        );

        Ok(folder)
    }

    /// Renames a folder.
    pub async fn rename_folder(&self, folder_id: FolderId, name: &str) -> AppResult<()> {
        let name = validate_name(name)?;

        let updated = self
            .folder_repo
            .update(folder_id, FolderPatch::rename(name.clone()))
            .await?;
        if updated == 0 {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        info!(folder_id = %folder_id, name = %name, "Folder renamed");
        Ok(())
    }

    /// Deletes a folder, its whole subtree, and every note inside it.
    ///
    /// Deleting a folder that is already gone is a no-op.
    pub async fn delete_folder(&self, folder_id: FolderId) -> AppResult<()> {
        let report = self.cascade.remove(folder_id).await?;

        info!(
            folder_id = %folder_id,
            folders_deleted = report.folders_deleted,
            notes_deleted = report.notes_deleted,
            "Folder deleted"
        );
        Ok(())
    }

    /// Reports what `delete_folder` would remove without removing anything.
    pub async fn preview_delete(&self, folder_id: FolderId) -> AppResult<DeletePreview> {
        self.folder_repo.get(folder_id).await?;

        let mut folder_ids = vec![folder_id];
        folder_ids.extend(self.finder.find_all_descendant_ids(folder_id).await?);
        let note_count = self.note_repo.find_by_folders(&folder_ids).await?.len();

        Ok(DeletePreview {
            folder_ids,
            note_count,
        })
    }

    /// Moves a folder under `new_parent_id`, or to the root when `None`.
    pub async fn move_folder(
        &self,
        folder_id: FolderId,
        new_parent_id: Option<FolderId>,
    ) -> AppResult<()> {
        let level = self.cascade.move_folder(folder_id, new_parent_id).await?;

        info!(
            folder_id = %folder_id,
            parent_id = ?new_parent_id.map(|id| id.to_string()),
            level,
            "Folder moved"
        );
        Ok(())
    }

    /// Ancestor chain of a folder, root first, ending with the folder itself.
    pub async fn get_breadcrumbs(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        let mut folder = self.folder_repo.get(folder_id).await?;
        let mut seen = HashSet::from([folder.id]);
        let mut chain = Vec::new();

        while let Some(parent_id) = folder.parent_id {
            if chain.len() as u32 >= self.config.max_depth || !seen.insert(parent_id) {
                return Err(AppError::too_deep(format!(
                    "Ancestor chain of folder {folder_id} exceeds the maximum depth of {}",
                    self.config.max_depth
                )));
            }
            let parent = self.folder_repo.find_by_id(parent_id).await?.ok_or_else(|| {
                AppError::not_found(format!(
                    "Ancestor {parent_id} of folder {folder_id} not found"
                ))
            })?;
            chain.push(std::mem::replace(&mut folder, parent));
        }

        chain.push(folder);
        chain.reverse();
        Ok(chain)
    }

    /// Rewrites every cached level that disagrees with the folder topology.
    ///
    /// Returns the number of folders fixed. Folders that cannot be reached
    /// from a root are left alone.
    pub async fn repair_levels(&self) -> AppResult<u64> {
        let rows = self.folder_repo.find_all().await?;
        let expected = expected_levels(&rows);

        let mut repaired = 0;
        for folder in &rows {
            let Some(&level) = expected.get(&folder.id) else {
                warn!(folder_id = %folder.id, "Folder is unreachable from any root");
                continue;
            };
            if folder.level != level {
                repaired += self
                    .folder_repo
                    .update(folder.id, FolderPatch::level(level))
                    .await?;
            }
        }

        info!(checked = rows.len(), repaired, "Folder levels repaired");
        Ok(repaired)
    }
}

/// Trims a folder name and rejects blank ones.
fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    Ok(name.to_string())
}

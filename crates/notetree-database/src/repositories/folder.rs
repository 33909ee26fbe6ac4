//! Folder repository: the row-store adapter for the `folders` table.

use std::sync::Arc;

use chrono::Utc;

use notetree_core::error::{AppError, ErrorKind};
use notetree_core::result::AppResult;
use notetree_core::traits::gateway::RowGateway;
use notetree_core::types::filter::FilterField;
use notetree_core::types::sorting::SortField;
use notetree_core::types::FolderId;
use notetree_entity::folder::model::columns;
use notetree_entity::folder::{CreateFolder, Folder, FolderPatch, FOLDERS_TABLE};

/// Repository for folder rows and the flat queries the hierarchy needs.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    gateway: Arc<dyn RowGateway>,
}

impl FolderRepository {
    /// Create a new folder repository over a gateway.
    pub fn new(gateway: Arc<dyn RowGateway>) -> Self {
        Self { gateway }
    }

    /// List every folder, ordered by level ascending then newest first.
    pub async fn find_all(&self) -> AppResult<Vec<Folder>> {
        let rows = self
            .gateway
            .select_all(
                FOLDERS_TABLE,
                &[],
                &[
                    SortField::asc(columns::LEVEL),
                    SortField::desc(columns::CREATED_AT),
                ],
            )
            .await?;
        rows.into_iter().map(Folder::from_row).collect()
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        match self
            .gateway
            .select_one(FOLDERS_TABLE, &[FilterField::eq(columns::ID, id)])
            .await
        {
            Ok(row) => Folder::from_row(row).map(Some),
            Err(e) if e.is(ErrorKind::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Find a folder by ID, failing with `NotFound` when it is missing.
    pub async fn get(&self, id: FolderId) -> AppResult<Folder> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// IDs of every folder whose parent is in `parent_ids`.
    pub async fn find_child_ids(&self, parent_ids: &[FolderId]) -> AppResult<Vec<FolderId>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self
            .gateway
            .select_all(
                FOLDERS_TABLE,
                &[FilterField::is_in(columns::PARENT_ID, parent_ids)],
                &[SortField::asc(columns::CREATED_AT)],
            )
            .await?;
        rows.into_iter()
            .map(|row| Folder::from_row(row).map(|folder| folder.id))
            .collect()
    }

    /// Insert a new folder row. Identity and creation time are assigned here.
    pub async fn create(&self, data: CreateFolder) -> AppResult<Folder> {
        let folder = data.into_folder(FolderId::new(), Utc::now());
        let row = self.gateway.insert(FOLDERS_TABLE, folder.to_row()?).await?;
        Folder::from_row(row)
    }

    /// Apply a partial update to one folder. Returns the rows affected.
    pub async fn update(&self, id: FolderId, patch: FolderPatch) -> AppResult<u64> {
        if patch.is_empty() {
            return Ok(0);
        }
        self.gateway
            .update(
                FOLDERS_TABLE,
                patch.into_row(),
                &[FilterField::eq(columns::ID, id)],
            )
            .await
    }

    /// Set `level` on every direct child of the given parents in one call.
    pub async fn set_children_level(&self, parent_ids: &[FolderId], level: u32) -> AppResult<u64> {
        if parent_ids.is_empty() {
            return Ok(0);
        }
        self.gateway
            .update(
                FOLDERS_TABLE,
                FolderPatch::level(level).into_row(),
                &[FilterField::is_in(columns::PARENT_ID, parent_ids)],
            )
            .await
    }

    /// Delete every folder in `ids` in one call.
    pub async fn delete_many(&self, ids: &[FolderId]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.gateway
            .delete_where(FOLDERS_TABLE, &[FilterField::is_in(columns::ID, ids)])
            .await
    }
}

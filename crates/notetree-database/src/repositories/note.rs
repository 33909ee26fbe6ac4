//! Note repository: only the folder-scoped queries the cascade needs.

use std::sync::Arc;

use notetree_core::result::AppResult;
use notetree_core::traits::gateway::RowGateway;
use notetree_core::types::filter::FilterField;
use notetree_core::types::FolderId;
use notetree_entity::note::model::columns;
use notetree_entity::note::{NoteRef, NOTES_TABLE};

/// Repository for the notes owned by folders.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    gateway: Arc<dyn RowGateway>,
}

impl NoteRepository {
    /// Create a new note repository over a gateway.
    pub fn new(gateway: Arc<dyn RowGateway>) -> Self {
        Self { gateway }
    }

    /// Notes filed under any of the given folders.
    pub async fn find_by_folders(&self, folder_ids: &[FolderId]) -> AppResult<Vec<NoteRef>> {
        if folder_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self
            .gateway
            .select_all(
                NOTES_TABLE,
                &[FilterField::is_in(columns::FOLDER_ID, folder_ids)],
                &[],
            )
            .await?;
        rows.into_iter().map(NoteRef::from_row).collect()
    }

    /// Delete every note filed under any of the given folders in one call.
    pub async fn delete_by_folders(&self, folder_ids: &[FolderId]) -> AppResult<u64> {
        if folder_ids.is_empty() {
            return Ok(0);
        }
        self.gateway
            .delete_where(
                NOTES_TABLE,
                &[FilterField::is_in(columns::FOLDER_ID, folder_ids)],
            )
            .await
    }
}

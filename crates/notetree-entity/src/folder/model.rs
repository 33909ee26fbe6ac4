//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use notetree_core::error::{AppError, ErrorKind};
use notetree_core::result::AppResult;
use notetree_core::traits::Row;
use notetree_core::types::FolderId;

/// Name of the folders table.
pub const FOLDERS_TABLE: &str = "folders";

/// Column names of the folders table.
pub mod columns {
    /// Primary key.
    pub const ID: &str = "id";
    /// Display name.
    pub const NAME: &str = "name";
    /// Parent folder reference (null for roots).
    pub const PARENT_ID: &str = "parent_id";
    /// Cached depth.
    pub const LEVEL: &str = "level";
    /// Creation timestamp.
    pub const CREATED_AT: &str = "created_at";
}

/// A folder row in the flat hierarchy table.
///
/// `level` is a cache of the folder's depth: `0` exactly when `parent_id`
/// is `None`, otherwise the parent's level plus one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<FolderId>,
    /// Depth in the folder tree (0 for root).
    pub level: u32,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Decode a folder from a gateway row.
    pub fn from_row(row: Row) -> AppResult<Self> {
        serde_json::from_value(serde_json::Value::Object(row)).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Malformed folder row: {e}"),
                e,
            )
        })
    }

    /// Encode this folder as a gateway row.
    pub fn to_row(&self) -> AppResult<Row> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(row) => Ok(row),
            _ => Err(AppError::internal("Folder did not serialize to an object")),
        }
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Parent folder (None for root).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Level resolved from the parent at creation time.
    pub level: u32,
}

impl CreateFolder {
    /// Materialize the full row, assigning identity and creation time.
    pub fn into_folder(self, id: FolderId, created_at: DateTime<Utc>) -> Folder {
        Folder {
            id,
            name: self.name,
            parent_id: self.parent_id,
            level: self.level,
            created_at,
        }
    }
}

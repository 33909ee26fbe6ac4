//! Note reference model.

use serde::{Deserialize, Serialize};

use notetree_core::error::{AppError, ErrorKind};
use notetree_core::result::AppResult;
use notetree_core::traits::Row;
use notetree_core::types::{FolderId, NoteId};

/// Name of the notes table.
pub const NOTES_TABLE: &str = "notes";

/// Column names of the notes table used by the hierarchy engine.
pub mod columns {
    /// Primary key.
    pub const ID: &str = "id";
    /// Owning folder (null for unfiled notes).
    pub const FOLDER_ID: &str = "folder_id";
}

/// The slice of a note row the hierarchy engine cares about.
///
/// Any other columns of the row are ignored when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRef {
    /// Note ID.
    pub id: NoteId,
    /// Owning folder.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
}

impl NoteRef {
    /// Decode a note reference from a gateway row.
    pub fn from_row(row: Row) -> AppResult<Self> {
        serde_json::from_value(serde_json::Value::Object(row)).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Malformed note row: {e}"),
                e,
            )
        })
    }
}

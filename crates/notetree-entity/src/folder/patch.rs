//! Partial folder updates.

use serde_json::Value;

use notetree_core::traits::Row;
use notetree_core::types::FolderId;

use super::model::columns;

/// A partial update of a folder row.
///
/// Every field is optional; `None` leaves the column unchanged. For
/// `parent_id`, `Some(None)` moves the folder to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderPatch {
    /// New name.
    pub name: Option<String>,
    /// New parent.
    pub parent_id: Option<Option<FolderId>>,
    /// New cached level.
    pub level: Option<u32>,
}

impl FolderPatch {
    /// A patch that only renames.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A patch that reparents and sets the matching level.
    pub fn reparent(parent_id: Option<FolderId>, level: u32) -> Self {
        Self {
            parent_id: Some(parent_id),
            level: Some(level),
            ..Self::default()
        }
    }

    /// A patch that only rewrites the cached level.
    pub fn level(level: u32) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }

    /// Returns `true` if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none() && self.level.is_none()
    }

    /// Build the gateway patch row, one column per present field.
    pub fn into_row(self) -> Row {
        let mut row = Row::new();
        if let Some(name) = self.name {
            row.insert(columns::NAME.into(), Value::String(name));
        }
        if let Some(parent_id) = self.parent_id {
            let value = match parent_id {
                Some(id) => Value::String(id.to_string()),
                None => Value::Null,
            };
            row.insert(columns::PARENT_ID.into(), value);
        }
        if let Some(level) = self.level {
            row.insert(columns::LEVEL.into(), Value::from(level));
        }
        row
    }
}

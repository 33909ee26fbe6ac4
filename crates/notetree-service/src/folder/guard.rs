//! Cycle guard for reparenting.

use notetree_core::error::AppError;
use notetree_core::result::AppResult;
use notetree_core::types::FolderId;

use super::descendants::{DescendantFinder, Subtree};

/// Rejects moves that would place a folder under itself.
#[derive(Debug, Clone)]
pub struct CycleGuard {
    /// Descendant finder.
    finder: DescendantFinder,
}

impl CycleGuard {
    /// Creates a new cycle guard.
    pub fn new(finder: DescendantFinder) -> Self {
        Self { finder }
    }

    /// Checks that `folder_id` may be moved under `new_parent_id`.
    ///
    /// Moving to the root is always safe. Otherwise the move fails with
    /// `InvalidOperation` when the new parent is the folder itself or one of
    /// its descendants. The collected subtree is returned so the caller can
    /// reuse its height.
    pub async fn assert_safe_reparent(
        &self,
        folder_id: FolderId,
        new_parent_id: Option<FolderId>,
    ) -> AppResult<Subtree> {
        if new_parent_id == Some(folder_id) {
            return Err(cycle_error());
        }

        let subtree = self.finder.collect(folder_id).await?;
        match new_parent_id {
            Some(parent_id) if subtree.contains(parent_id) => Err(cycle_error()),
            _ => Ok(subtree),
        }
    }
}

fn cycle_error() -> AppError {
    AppError::invalid_operation("cannot move a folder into its own descendant")
}

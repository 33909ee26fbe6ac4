//! Convenience result type alias for NoteTree.

use crate::error::AppError;

/// A specialized `Result` type for NoteTree operations.
pub type AppResult<T> = Result<T, AppError>;

//! Note references.
//!
//! Notes are owned by an external collaborator; the hierarchy engine only
//! relies on the `folder_id` column of the notes table.

pub mod model;

pub use model::{NoteRef, NOTES_TABLE};

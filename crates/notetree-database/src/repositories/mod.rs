//! Repositories translating hierarchy operations into gateway calls.

pub mod folder;
pub mod note;

pub use folder::FolderRepository;
pub use note::NoteRepository;

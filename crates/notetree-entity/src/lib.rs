//! # notetree-entity
//!
//! Domain entity models for NoteTree. Persisted entities map one-to-one
//! onto gateway rows (`notetree_core::traits::Row`); derived views such as
//! [`folder::FolderNode`] only ever exist in memory.

pub mod folder;
pub mod note;

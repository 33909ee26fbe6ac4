//! Folder tree building from the flat row set.

use std::collections::{HashMap, VecDeque};

use notetree_core::types::FolderId;
use notetree_entity::folder::{Folder, FolderNode};

/// Builds the forest of folder trees from a flat list of folders.
///
/// `rows` is expected in fetch order (level ascending, newest first); that
/// order is kept among siblings. Rows whose parent is missing are dropped
/// together with everything below them, and never surface as roots.
///
/// Runs on explicit stacks, so the depth of the forest is bounded by memory
/// only.
pub fn build_tree(rows: Vec<Folder>) -> Vec<FolderNode> {
    let mut roots = Vec::new();
    let mut children: HashMap<FolderId, Vec<Folder>> = HashMap::new();

    for folder in rows {
        match folder.parent_id {
            None => roots.push(folder),
            Some(parent_id) => children.entry(parent_id).or_default().push(folder),
        }
    }

    // Pre-order walk from the roots. Each child list leaves the index once,
    // so no row is placed twice.
    let mut order: Vec<(Folder, usize)> = Vec::new();
    let mut pending: Vec<Folder> = roots.into_iter().rev().collect();
    while let Some(folder) = pending.pop() {
        let kids = children.remove(&folder.id).unwrap_or_default();
        let child_count = kids.len();
        pending.extend(kids.into_iter().rev());
        order.push((folder, child_count));
    }

    // Reverse pre-order: a node's finished children sit on top of the stack,
    // last sibling first.
    let mut built: Vec<FolderNode> = Vec::new();
    for (folder, child_count) in order.into_iter().rev() {
        let mut kids = built.split_off(built.len().saturating_sub(child_count));
        kids.reverse();
        built.push(FolderNode {
            folder,
            children: kids,
        });
    }
    built.reverse();
    built
}

/// Computes the level every folder reachable from a root should have.
///
/// Roots get `0`, each child its parent's level plus one. Folders that are
/// unreachable (dangling parent, or caught in a cycle) are absent from the
/// result.
pub fn expected_levels(rows: &[Folder]) -> HashMap<FolderId, u32> {
    let mut children: HashMap<FolderId, Vec<FolderId>> = HashMap::new();
    let mut queue = VecDeque::new();

    for folder in rows {
        match folder.parent_id {
            None => queue.push_back((folder.id, 0)),
            Some(parent_id) => children.entry(parent_id).or_default().push(folder.id),
        }
    }

    let mut levels = HashMap::with_capacity(rows.len());
    while let Some((id, level)) = queue.pop_front() {
        if levels.insert(id, level).is_some() {
            continue;
        }
        for &child in children.get(&id).into_iter().flatten() {
            queue.push_back((child, level + 1));
        }
    }
    levels
}

//! Integration tests for cascading folder deletes.

mod helpers;

use std::collections::HashSet;

use notetree_core::error::ErrorKind;
use notetree_core::types::FolderId;
use notetree_entity::folder::FOLDERS_TABLE;
use notetree_entity::note::NOTES_TABLE;

use helpers::{Op, TestApp};

#[tokio::test]
async fn test_delete_projects_removes_subtree_and_notes() {
    let app = TestApp::new();
    let (work, projects, q1) = app.work_projects_q1().await;
    let kept = app.add_note(Some(work.id), "Standup").await;
    app.add_note(Some(projects.id), "Roadmap").await;
    app.add_note(Some(q1.id), "OKRs").await;
    app.add_note(Some(q1.id), "Budget").await;
    let unfiled = app.add_note(None, "Scratch").await;

    app.service.delete_folder(projects.id).await.unwrap();

    let remaining: Vec<FolderId> = app.folders().await.iter().map(|f| f.id).collect();
    assert_eq!(remaining, vec![work.id]);

    let notes: HashSet<_> = app.notes().await.iter().map(|n| n.id).collect();
    assert_eq!(notes, HashSet::from([kept, unfiled]));

    let tree = app.service.fetch_all_folders().await.unwrap();
    assert_eq!(tree.len(), 1);
    assert!(tree[0].children.is_empty());
}

#[tokio::test]
async fn test_delete_work_removes_all_notes() {
    let app = TestApp::new();
    let (work, projects, q1) = app.work_projects_q1().await;
    app.add_note(Some(work.id), "Standup").await;
    app.add_note(Some(projects.id), "Roadmap").await;
    app.add_note(Some(q1.id), "OKRs").await;
    let personal = app.create("Personal", None).await;
    let kept = app.add_note(Some(personal.id), "Groceries").await;

    app.service.delete_folder(work.id).await.unwrap();

    let remaining: Vec<FolderId> = app.folders().await.iter().map(|f| f.id).collect();
    assert_eq!(remaining, vec![personal.id]);
    let notes: Vec<_> = app.notes().await.iter().map(|n| n.id).collect();
    assert_eq!(notes, vec![kept]);

    let tree = app.service.fetch_all_folders().await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].id(), personal.id);
}

#[tokio::test]
async fn test_delete_uses_one_bulk_call_per_table() {
    let app = TestApp::new();
    let (work, _, _) = app.work_projects_q1().await;
    app.gateway.reset_calls();

    app.service.delete_folder(work.id).await.unwrap();

    assert_eq!(app.gateway.calls(Op::Delete, NOTES_TABLE), 1);
    assert_eq!(app.gateway.calls(Op::Delete, FOLDERS_TABLE), 1);
    assert!(app.folders().await.is_empty());
}

#[tokio::test]
async fn test_second_delete_is_a_no_op() {
    let app = TestApp::new();
    let (work, projects, _) = app.work_projects_q1().await;

    app.service.delete_folder(projects.id).await.unwrap();
    let after_first = app.folders().await;

    app.service.delete_folder(projects.id).await.unwrap();
    app.service.delete_folder(FolderId::new()).await.unwrap();

    assert_eq!(app.folders().await, after_first);
    assert_eq!(after_first[0].id, work.id);
}

#[tokio::test]
async fn test_note_delete_failure_leaves_folders_intact() {
    let app = TestApp::new();
    let (work, projects, q1) = app.work_projects_q1().await;
    app.add_note(Some(q1.id), "OKRs").await;
    app.gateway.fail(Op::Delete, NOTES_TABLE);

    let err = app.service.delete_folder(work.id).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Gateway);
    assert_eq!(app.gateway.calls(Op::Delete, FOLDERS_TABLE), 0);
    let ids: HashSet<_> = app.folders().await.iter().map(|f| f.id).collect();
    assert_eq!(ids, HashSet::from([work.id, projects.id, q1.id]));
    assert_eq!(app.notes().await.len(), 1);
}

#[tokio::test]
async fn test_folder_delete_failure_then_retry_completes() {
    let app = TestApp::new();
    let (_, projects, q1) = app.work_projects_q1().await;
    app.add_note(Some(projects.id), "Roadmap").await;
    app.add_note(Some(q1.id), "OKRs").await;
    app.gateway.fail(Op::Delete, FOLDERS_TABLE);

    let err = app.service.delete_folder(projects.id).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Gateway);
    assert!(app.notes().await.is_empty());
    assert_eq!(app.folders().await.len(), 3);

    app.gateway.clear();
    app.service.delete_folder(projects.id).await.unwrap();

    assert_eq!(app.folders().await.len(), 1);
    app.assert_levels_consistent().await;
}

#[tokio::test]
async fn test_preview_delete_counts_without_deleting() {
    let app = TestApp::new();
    let (work, projects, q1) = app.work_projects_q1().await;
    app.add_note(Some(work.id), "Standup").await;
    app.add_note(Some(q1.id), "OKRs").await;
    app.add_note(Some(q1.id), "Budget").await;

    let preview = app.service.preview_delete(projects.id).await.unwrap();

    assert_eq!(preview.folder_ids[0], projects.id);
    let ids: HashSet<_> = preview.folder_ids.iter().copied().collect();
    assert_eq!(ids, HashSet::from([projects.id, q1.id]));
    assert_eq!(preview.note_count, 2);
    assert_eq!(app.folders().await.len(), 3);
    assert_eq!(app.notes().await.len(), 3);

    let err = app.service.preview_delete(FolderId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

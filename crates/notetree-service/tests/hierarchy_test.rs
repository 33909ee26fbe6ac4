//! Integration tests for building, creating, renaming, and reading folders.

mod helpers;

use chrono::{Duration, TimeZone, Utc};

use notetree_core::error::ErrorKind;
use notetree_core::traits::RowGateway;
use notetree_core::types::{FilterField, FolderId};
use notetree_entity::folder::{FOLDERS_TABLE, Folder, FolderNode, FolderPatch};

use helpers::{Op, TestApp};

fn names(nodes: &[FolderNode]) -> Vec<&str> {
    nodes.iter().map(FolderNode::name).collect()
}

#[tokio::test]
async fn test_work_projects_q1_levels_and_tree() {
    let app = TestApp::new();
    let (work, projects, q1) = app.work_projects_q1().await;

    assert_eq!((work.level, projects.level, q1.level), (0, 1, 2));
    assert_eq!(projects.parent_id, Some(work.id));
    assert_eq!(q1.parent_id, Some(projects.id));

    let tree = app.service.fetch_all_folders().await.unwrap();
    assert_eq!(names(&tree), vec!["Work"]);
    assert_eq!(names(&tree[0].children), vec!["Projects"]);
    assert_eq!(names(&tree[0].children[0].children), vec!["Q1"]);
    app.assert_levels_consistent().await;
}

#[tokio::test]
async fn test_tree_orders_roots_and_siblings_newest_first() {
    let app = TestApp::new();
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let mut rows = Vec::new();
    let old_root = Folder {
        id: FolderId::new(),
        name: "Old".into(),
        parent_id: None,
        level: 0,
        created_at: base,
    };
    let new_root = Folder {
        name: "New".into(),
        id: FolderId::new(),
        created_at: base + Duration::hours(1),
        ..old_root.clone()
    };
    for (i, name) in ["First", "Second", "Third"].into_iter().enumerate() {
        rows.push(Folder {
            id: FolderId::new(),
            name: name.into(),
            parent_id: Some(old_root.id),
            level: 1,
            created_at: base + Duration::minutes(i as i64),
        });
    }
    rows.push(old_root.clone());
    rows.push(new_root.clone());
    app.store
        .seed(FOLDERS_TABLE, rows.iter().map(|f| f.to_row().unwrap()))
        .await;

    let tree = app.service.fetch_all_folders().await.unwrap();

    assert_eq!(names(&tree), vec!["New", "Old"]);
    assert_eq!(names(&tree[1].children), vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn test_dangling_parent_is_dropped_from_tree() {
    let app = TestApp::new();
    let (work, _, _) = app.work_projects_q1().await;
    let orphan = app.seed_folder("Orphan", Some(FolderId::new()), 1).await;
    app.seed_folder("OrphanChild", Some(orphan.id), 2).await;

    let tree = app.service.fetch_all_folders().await.unwrap();

    let placed: usize = tree.iter().map(FolderNode::count).sum();
    assert_eq!(placed, 3);
    assert_eq!(names(&tree), vec!["Work"]);
    assert!(tree[0].find(orphan.id).is_none());
    assert!(tree[0].find(work.id).is_some());
}

#[tokio::test]
async fn test_fetch_all_folders_handles_hand_edited_deep_chain() {
    const DEPTH: u32 = 10_000;
    let app = TestApp::new();
    let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let mut rows: Vec<Folder> = Vec::with_capacity(DEPTH as usize);
    for level in 0..DEPTH {
        let parent_id = rows.last().map(|parent| parent.id);
        rows.push(Folder {
            id: FolderId::new(),
            name: format!("Level {level}"),
            parent_id,
            level,
            created_at,
        });
    }
    let deepest = rows[rows.len() - 1].id;
    app.store
        .seed(FOLDERS_TABLE, rows.iter().map(|f| f.to_row().unwrap()))
        .await;

    let tree = app.service.fetch_all_folders().await.unwrap();

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].count(), DEPTH as usize);
    assert_eq!(tree[0].find(deepest).unwrap().folder.level, DEPTH - 1);
}

#[tokio::test]
async fn test_empty_workspace_is_empty_forest() {
    let app = TestApp::new();
    assert!(app.service.fetch_all_folders().await.unwrap().is_empty());
    assert!(app.service.list_folders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_under_missing_parent_writes_nothing() {
    let app = TestApp::new();

    let err = app
        .service
        .create_folder("Lost", Some(FolderId::new()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(app.gateway.calls(Op::Insert, FOLDERS_TABLE), 0);
    assert!(app.folders().await.is_empty());
}

#[tokio::test]
async fn test_create_rejects_blank_name_and_trims() {
    let app = TestApp::new();

    for blank in ["", "   ", "\t"] {
        let err = app.service.create_folder(blank, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
    assert!(app.folders().await.is_empty());

    let folder = app.create("  Inbox  ", None).await;
    assert_eq!(folder.name, "Inbox");
}

#[tokio::test]
async fn test_create_past_max_depth_is_too_deep() {
    let app = TestApp::with_max_depth(2);
    let (_, _, q1) = app.work_projects_q1().await;

    let err = app.service.create_folder("Week 1", Some(q1.id)).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::TooDeep);
    assert_eq!(app.folders().await.len(), 3);
}

#[tokio::test]
async fn test_create_surfaces_gateway_failure() {
    let app = TestApp::new();
    app.gateway.fail(Op::Insert, FOLDERS_TABLE);

    let err = app.service.create_folder("Work", None).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Gateway);
}

#[tokio::test]
async fn test_rename_changes_only_name() {
    let app = TestApp::new();
    let (work, projects, _) = app.work_projects_q1().await;

    app.service.rename_folder(projects.id, " Clients ").await.unwrap();

    let renamed = app.folder(projects.id).await.unwrap();
    assert_eq!(renamed.name, "Clients");
    assert_eq!(renamed.parent_id, Some(work.id));
    assert_eq!(renamed.level, 1);
    assert_eq!(renamed.created_at, projects.created_at);
}

#[tokio::test]
async fn test_rename_missing_or_blank_fails() {
    let app = TestApp::new();
    let work = app.create("Work", None).await;

    let err = app
        .service
        .rename_folder(FolderId::new(), "Ghost")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app.service.rename_folder(work.id, "  ").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.folder(work.id).await.unwrap().name, "Work");
}

#[tokio::test]
async fn test_get_and_list_folders() {
    let app = TestApp::new();
    let (work, projects, q1) = app.work_projects_q1().await;

    assert_eq!(app.service.get_folder(projects.id).await.unwrap(), projects);
    let err = app.service.get_folder(FolderId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let levels: Vec<u32> = app
        .service
        .list_folders()
        .await
        .unwrap()
        .iter()
        .map(|f| f.level)
        .collect();
    assert_eq!(levels, vec![0, 1, 2]);
    assert!(app.folder(work.id).await.is_some() && app.folder(q1.id).await.is_some());
}

#[tokio::test]
async fn test_breadcrumbs_run_root_to_folder() {
    let app = TestApp::new();
    let (work, projects, q1) = app.work_projects_q1().await;

    let crumbs = app.service.get_breadcrumbs(q1.id).await.unwrap();
    let ids: Vec<FolderId> = crumbs.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![work.id, projects.id, q1.id]);

    let root_only = app.service.get_breadcrumbs(work.id).await.unwrap();
    assert_eq!(root_only.len(), 1);
}

#[tokio::test]
async fn test_breadcrumbs_report_broken_chains() {
    let app = TestApp::new();

    let err = app.service.get_breadcrumbs(FolderId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let orphan = app.seed_folder("Orphan", Some(FolderId::new()), 1).await;
    let err = app.service.get_breadcrumbs(orphan.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Two rows pointing at each other.
    let a = app.seed_folder("A", None, 0).await;
    let b = app.seed_folder("B", Some(a.id), 1).await;
    app.store
        .update(
            FOLDERS_TABLE,
            FolderPatch::reparent(Some(b.id), 2).into_row(),
            &[FilterField::eq("id", a.id)],
        )
        .await
        .unwrap();
    let err = app.service.get_breadcrumbs(b.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::TooDeep);
}

#[tokio::test]
async fn test_repair_levels_fixes_only_stale_rows() {
    let app = TestApp::new();
    let work = app.seed_folder("Work", None, 3).await;
    let projects = app.seed_folder("Projects", Some(work.id), 1).await;
    let q1 = app.seed_folder("Q1", Some(projects.id), 9).await;
    let orphan = app.seed_folder("Orphan", Some(FolderId::new()), 4).await;

    let repaired = app.service.repair_levels().await.unwrap();

    assert_eq!(repaired, 2);
    assert_eq!(app.folder(work.id).await.unwrap().level, 0);
    assert_eq!(app.folder(projects.id).await.unwrap().level, 1);
    assert_eq!(app.folder(q1.id).await.unwrap().level, 2);
    assert_eq!(app.folder(orphan.id).await.unwrap().level, 4);

    assert_eq!(app.service.repair_levels().await.unwrap(), 0);
}

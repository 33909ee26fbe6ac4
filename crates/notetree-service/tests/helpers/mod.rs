//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use notetree_core::config::HierarchyConfig;
use notetree_core::error::AppError;
use notetree_core::result::AppResult;
use notetree_core::traits::{Row, RowGateway};
use notetree_core::types::{FilterField, FolderId, NoteId, SortField};
use notetree_database::MemoryGateway;
use notetree_entity::folder::{FOLDERS_TABLE, Folder};
use notetree_entity::note::{NOTES_TABLE, NoteRef};
use notetree_service::FolderService;

/// Gateway call kinds a fault can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone)]
struct Fault {
    op: Op,
    table: String,
    /// Matching calls allowed to succeed before the fault fires.
    after: usize,
}

/// Wraps a [`MemoryGateway`], counting calls and failing chosen ones.
#[derive(Debug, Clone, Default)]
pub struct FaultyGateway {
    inner: MemoryGateway,
    fault: Arc<Mutex<Option<Fault>>>,
    calls: Arc<Mutex<HashMap<(Op, String), usize>>>,
}

impl FaultyGateway {
    pub fn new(inner: MemoryGateway) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Fail every `op` on `table` from now on.
    pub fn fail(&self, op: Op, table: &str) {
        self.fail_after(op, table, 0);
    }

    /// Let `after` matching calls through, then fail the rest.
    pub fn fail_after(&self, op: Op, table: &str, after: usize) {
        *self.fault.lock().unwrap() = Some(Fault {
            op,
            table: table.to_string(),
            after,
        });
    }

    pub fn clear(&self) {
        *self.fault.lock().unwrap() = None;
    }

    /// Number of `op` calls made against `table`.
    pub fn calls(&self, op: Op, table: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&(op, table.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn check(&self, op: Op, table: &str) -> AppResult<()> {
        let mut fault = self.fault.lock().unwrap();
        self.calls
            .lock()
            .unwrap()
            .entry((op, table.to_string()))
            .and_modify(|n| *n += 1)
            .or_insert(1);

        match fault.as_mut() {
            Some(f) if f.op == op && f.table == table => {
                if f.after == 0 {
                    Err(AppError::gateway(format!("injected {op:?} failure on '{table}'")))
                } else {
                    f.after -= 1;
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl RowGateway for FaultyGateway {
    async fn select_all(
        &self,
        table: &str,
        filters: &[FilterField],
        order_by: &[SortField],
    ) -> AppResult<Vec<Row>> {
        self.check(Op::Select, table)?;
        self.inner.select_all(table, filters, order_by).await
    }

    async fn select_one(&self, table: &str, filters: &[FilterField]) -> AppResult<Row> {
        self.check(Op::Select, table)?;
        self.inner.select_one(table, filters).await
    }

    async fn insert(&self, table: &str, row: Row) -> AppResult<Row> {
        self.check(Op::Insert, table)?;
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: &str, patch: Row, filters: &[FilterField]) -> AppResult<u64> {
        self.check(Op::Update, table)?;
        self.inner.update(table, patch, filters).await
    }

    async fn delete_where(&self, table: &str, filters: &[FilterField]) -> AppResult<u64> {
        self.check(Op::Delete, table)?;
        self.inner.delete_where(table, filters).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

/// Test application context.
pub struct TestApp {
    /// Backing tables, for direct inspection.
    pub store: MemoryGateway,
    /// Gateway the service talks to.
    pub gateway: FaultyGateway,
    /// The service under test.
    pub service: FolderService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(HierarchyConfig::default())
    }

    pub fn with_max_depth(max_depth: u32) -> Self {
        Self::with_config(HierarchyConfig { max_depth })
    }

    pub fn with_config(config: HierarchyConfig) -> Self {
        let store = MemoryGateway::new();
        let gateway = FaultyGateway::new(store.clone());
        let service = FolderService::from_gateway(Arc::new(gateway.clone()), config);
        Self {
            store,
            gateway,
            service,
        }
    }

    /// Create a folder through the service.
    pub async fn create(&self, name: &str, parent_id: Option<FolderId>) -> Folder {
        self.service
            .create_folder(name, parent_id)
            .await
            .expect("Failed to create folder")
    }

    /// Create `Work > Projects > Q1` and return them in that order.
    pub async fn work_projects_q1(&self) -> (Folder, Folder, Folder) {
        let work = self.create("Work", None).await;
        let projects = self.create("Projects", Some(work.id)).await;
        let q1 = self.create("Q1", Some(projects.id)).await;
        (work, projects, q1)
    }

    /// Insert a note filed in `folder_id`.
    pub async fn add_note(&self, folder_id: Option<FolderId>, title: &str) -> NoteId {
        let id = NoteId::new();
        let serde_json::Value::Object(row) = json!({
            "id": id,
            "title": title,
            "content": "",
            "color": null,
            "is_pinned": false,
            "is_urgent": false,
            "folder_id": folder_id,
            "created_at": Utc::now(),
        }) else {
            unreachable!()
        };
        self.store.seed(NOTES_TABLE, [row]).await;
        id
    }

    /// Insert a folder row as-is, skipping every engine check.
    pub async fn seed_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
        level: u32,
    ) -> Folder {
        let folder = Folder {
            id: FolderId::new(),
            name: name.to_string(),
            parent_id,
            level,
            created_at: Utc::now(),
        };
        self.store
            .seed(FOLDERS_TABLE, [folder.to_row().expect("folder row")])
            .await;
        folder
    }

    /// All folder rows currently stored.
    pub async fn folders(&self) -> Vec<Folder> {
        self.store
            .rows(FOLDERS_TABLE)
            .await
            .into_iter()
            .map(|row| Folder::from_row(row).expect("folder row"))
            .collect()
    }

    pub async fn folder(&self, id: FolderId) -> Option<Folder> {
        self.folders().await.into_iter().find(|f| f.id == id)
    }

    /// Stored level of an existing folder.
    pub async fn level(&self, id: FolderId) -> u32 {
        self.folder(id).await.expect("folder exists").level
    }

    /// All note rows currently stored.
    pub async fn notes(&self) -> Vec<NoteRef> {
        self.store
            .rows(NOTES_TABLE)
            .await
            .into_iter()
            .map(|row| NoteRef::from_row(row).expect("note row"))
            .collect()
    }

    /// Every stored level agrees with its parent's.
    pub async fn assert_levels_consistent(&self) {
        let folders = self.folders().await;
        let by_id: HashMap<FolderId, &Folder> = folders.iter().map(|f| (f.id, f)).collect();
        for folder in &folders {
            match folder.parent_id {
                None => assert_eq!(folder.level, 0, "root {} is not at level 0", folder.name),
                Some(parent_id) => {
                    let parent = by_id
                        .get(&parent_id)
                        .unwrap_or_else(|| panic!("{} has a missing parent", folder.name));
                    assert_eq!(
                        folder.level,
                        parent.level + 1,
                        "{} is at level {} under {} at level {}",
                        folder.name,
                        folder.level,
                        parent.name,
                        parent.level
                    );
                }
            }
        }
    }
}

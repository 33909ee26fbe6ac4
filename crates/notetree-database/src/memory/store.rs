//! In-memory row gateway backed by a table map behind an async lock.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use notetree_core::error::AppError;
use notetree_core::result::AppResult;
use notetree_core::traits::gateway::{Row, RowGateway};
use notetree_core::types::filter::{FilterField, FilterOp, FilterValue};
use notetree_core::types::sorting::{SortDirection, SortField};

/// In-memory row gateway.
///
/// Tables are created lazily on first insert and keep rows in insertion
/// order, so ties under `order_by` resolve the same way on every call.
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    /// Rows keyed by table name.
    tables: Arc<RwLock<HashMap<String, Vec<Row>>>>,
}

impl MemoryGateway {
    /// Create an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows as-is, bypassing key checks. Intended for fixtures.
    pub async fn seed(&self, table: &str, rows: impl IntoIterator<Item = Row>) {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().extend(rows);
    }

    /// Snapshot every row of a table in insertion order.
    pub async fn rows(&self, table: &str) -> Vec<Row> {
        let tables = self.tables.read().await;
        tables.get(table).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl RowGateway for MemoryGateway {
    async fn select_all(
        &self,
        table: &str,
        filters: &[FilterField],
        order_by: &[SortField],
    ) -> AppResult<Vec<Row>> {
        let tables = self.tables.read().await;
        let mut rows = Vec::new();
        for row in tables.get(table).into_iter().flatten() {
            if matches_all(row, filters)? {
                rows.push(row.clone());
            }
        }
        drop(tables);

        if !order_by.is_empty() {
            rows.sort_by(|a, b| compare_rows(a, b, order_by));
        }

        debug!(table, count = rows.len(), "Selected rows");
        Ok(rows)
    }

    async fn select_one(&self, table: &str, filters: &[FilterField]) -> AppResult<Row> {
        let tables = self.tables.read().await;
        for row in tables.get(table).into_iter().flatten() {
            if matches_all(row, filters)? {
                return Ok(row.clone());
            }
        }
        Err(AppError::not_found(format!("No row in '{table}' matches")))
    }

    async fn insert(&self, table: &str, row: Row) -> AppResult<Row> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        if let Some(id) = row.get("id").filter(|id| !id.is_null()) {
            if rows.iter().any(|existing| existing.get("id") == Some(id)) {
                return Err(AppError::gateway(format!(
                    "Duplicate key {id} in '{table}'"
                )));
            }
        }

        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, patch: Row, filters: &[FilterField]) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };

        let targets = rows
            .iter()
            .map(|row| matches_all(row, filters))
            .collect::<AppResult<Vec<bool>>>()?;

        let mut affected = 0u64;
        for (row, _) in rows.iter_mut().zip(targets).filter(|(_, hit)| *hit) {
            for (column, value) in &patch {
                row.insert(column.clone(), value.clone());
            }
            affected += 1;
        }

        debug!(table, affected, "Updated rows");
        Ok(affected)
    }

    async fn delete_where(&self, table: &str, filters: &[FilterField]) -> AppResult<u64> {
        if filters.is_empty() {
            return Err(AppError::validation(format!(
                "Refusing unfiltered delete on '{table}'"
            )));
        }

        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };

        // Evaluate every filter before removing anything.
        let doomed = rows
            .iter()
            .map(|row| matches_all(row, filters))
            .collect::<AppResult<Vec<bool>>>()?;

        let before = rows.len();
        let mut doomed = doomed.into_iter();
        rows.retain(|_| !doomed.next().unwrap_or(false));
        let affected = (before - rows.len()) as u64;

        debug!(table, affected, "Deleted rows");
        Ok(affected)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Returns `true` if the row satisfies every filter.
fn matches_all(row: &Row, filters: &[FilterField]) -> AppResult<bool> {
    for filter in filters {
        if !matches(row.get(&filter.field), filter)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn matches(value: Option<&Value>, filter: &FilterField) -> AppResult<bool> {
    let matched = match (filter.op, &filter.value) {
        (FilterOp::IsNull, _) | (FilterOp::Eq, FilterValue::Null) => {
            value.is_none_or(Value::is_null)
        }
        (FilterOp::Eq, FilterValue::String(expected)) => {
            text_of(value).as_deref() == Some(expected.as_str())
        }
        (FilterOp::In, FilterValue::StringList(set)) => {
            text_of(value).is_some_and(|text| set.contains(&text))
        }
        (op, value) => {
            return Err(AppError::validation(format!(
                "Unsupported filter {op:?} with {value:?} on '{}'",
                filter.field
            )));
        }
    };
    Ok(matched)
}

/// Textual form of a column value, as a SQL `::text` cast would give it.
fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn compare_rows(a: &Row, b: &Row, order_by: &[SortField]) -> Ordering {
    for sort in order_by {
        let ordering = compare_values(a.get(&sort.field), b.get(&sort.field));
        let ordering = match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Nulls compare greater than any value, matching PostgreSQL's default
/// `NULLS LAST` for ascending and `NULLS FIRST` for descending order.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => match (timestamp(x), timestamp(y)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x.cmp(y),
        },
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

//! PostgreSQL row gateway.
//!
//! Rows travel as `jsonb`: reads select `to_jsonb(t)` and writes unpack the
//! JSON object with `jsonb_populate_record`, so column types stay owned by
//! the schema. Table and column names are checked against a strict
//! identifier pattern before they are spliced into SQL; values are always
//! bound parameters.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use notetree_core::error::{AppError, ErrorKind};
use notetree_core::result::AppResult;
use notetree_core::traits::gateway::{Row, RowGateway};
use notetree_core::types::filter::{FilterField, FilterOp, FilterValue};
use notetree_core::types::sorting::SortField;

/// Row gateway over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    /// Create a new gateway on an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RowGateway for PgGateway {
    async fn select_all(
        &self,
        table: &str,
        filters: &[FilterField],
        order_by: &[SortField],
    ) -> AppResult<Vec<Row>> {
        let mut qb = select_query(table, filters, order_by, None)?;
        let values = qb
            .build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("select", table, e))?;

        debug!(table, count = values.len(), "Selected rows");
        values.into_iter().map(into_row).collect()
    }

    async fn select_one(&self, table: &str, filters: &[FilterField]) -> AppResult<Row> {
        let mut qb = select_query(table, filters, &[], Some(1))?;
        qb.build_query_scalar::<Value>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("select", table, e))?
            .map(into_row)
            .transpose()?
            .ok_or_else(|| AppError::not_found(format!("No row in '{table}' matches")))
    }

    async fn insert(&self, table: &str, row: Row) -> AppResult<Row> {
        let mut qb = insert_query(table, row)?;
        let value = qb
            .build_query_scalar::<Value>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("insert", table, e))?;
        into_row(value)
    }

    async fn update(&self, table: &str, patch: Row, filters: &[FilterField]) -> AppResult<u64> {
        let mut qb = update_query(table, patch, filters)?;
        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("update", table, e))?;

        debug!(table, affected = result.rows_affected(), "Updated rows");
        Ok(result.rows_affected())
    }

    async fn delete_where(&self, table: &str, filters: &[FilterField]) -> AppResult<u64> {
        let mut qb = delete_query(table, filters)?;
        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("delete", table, e))?;

        debug!(table, affected = result.rows_affected(), "Deleted rows");
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Gateway, "Health check failed", e))
    }
}

fn select_query(
    table: &str,
    filters: &[FilterField],
    order_by: &[SortField],
    limit: Option<u32>,
) -> AppResult<QueryBuilder<'static, Postgres>> {
    let mut qb = QueryBuilder::new(format!("SELECT to_jsonb(t) FROM {} AS t", ident(table)?));
    push_filters(&mut qb, filters)?;

    for (i, sort) in order_by.iter().enumerate() {
        qb.push(if i == 0 { " ORDER BY " } else { ", " });
        qb.push(format!("t.{} {}", ident(&sort.field)?, sort.direction.as_sql()));
    }
    if let Some(limit) = limit {
        qb.push(format!(" LIMIT {limit}"));
    }
    Ok(qb)
}

fn insert_query(table: &str, row: Row) -> AppResult<QueryBuilder<'static, Postgres>> {
    let table = ident(table)?;
    if row.is_empty() {
        return Err(AppError::validation(format!("Refusing empty insert into '{table}'")));
    }
    let columns = row
        .keys()
        .map(|k| ident(k))
        .collect::<AppResult<Vec<_>>>()?
        .join(", ");

    let mut qb = QueryBuilder::new(format!(
        "INSERT INTO {table} AS t ({columns}) SELECT {columns} FROM jsonb_populate_record(NULL::{table}, "
    ));
    qb.push_bind(Value::Object(row));
    qb.push(") RETURNING to_jsonb(t)");
    Ok(qb)
}

fn update_query(
    table: &str,
    patch: Row,
    filters: &[FilterField],
) -> AppResult<QueryBuilder<'static, Postgres>> {
    let table = ident(table)?;
    if patch.is_empty() {
        return Err(AppError::validation(format!("Refusing empty patch on '{table}'")));
    }
    let assignments = patch
        .keys()
        .map(|k| ident(k).map(|column| format!("{column} = p.{column}")))
        .collect::<AppResult<Vec<_>>>()?
        .join(", ");

    let mut qb = QueryBuilder::new(format!(
        "UPDATE {table} AS t SET {assignments} FROM jsonb_populate_record(NULL::{table}, "
    ));
    qb.push_bind(Value::Object(patch));
    qb.push(") AS p");
    push_filters(&mut qb, filters)?;
    Ok(qb)
}

fn delete_query(table: &str, filters: &[FilterField]) -> AppResult<QueryBuilder<'static, Postgres>> {
    let table = ident(table)?;
    if filters.is_empty() {
        return Err(AppError::validation(format!(
            "Refusing unfiltered delete on '{table}'"
        )));
    }
    let mut qb = QueryBuilder::new(format!("DELETE FROM {table} AS t"));
    push_filters(&mut qb, filters)?;
    Ok(qb)
}

fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filters: &[FilterField]) -> AppResult<()> {
    for (i, filter) in filters.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        let column = ident(&filter.field)?;
        match (filter.op, &filter.value) {
            (FilterOp::IsNull, _) | (FilterOp::Eq, FilterValue::Null) => {
                qb.push(format!("t.{column} IS NULL"));
            }
            (FilterOp::Eq, FilterValue::String(value)) => {
                qb.push(format!("t.{column}::text = "));
                qb.push_bind(value.clone());
            }
            (FilterOp::In, FilterValue::StringList(values)) => {
                qb.push(format!("t.{column}::text = ANY("));
                qb.push_bind(values.clone());
                qb.push(")");
            }
            (op, value) => {
                return Err(AppError::validation(format!(
                    "Unsupported filter {op:?} with {value:?} on '{column}'"
                )));
            }
        }
    }
    Ok(())
}

/// Accept only plain lower-case SQL identifiers.
fn ident(name: &str) -> AppResult<&str> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(AppError::validation(format!("Invalid identifier '{name}'")))
    }
}

fn into_row(value: Value) -> AppResult<Row> {
    match value {
        Value::Object(row) => Ok(row),
        other => Err(AppError::new(
            ErrorKind::Serialization,
            format!("Expected a JSON object row, got {other}"),
        )),
    }
}

fn query_error(action: &str, table: &str, err: sqlx::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Gateway,
        format!("Failed to {action} '{table}': {err}"),
        err,
    )
}

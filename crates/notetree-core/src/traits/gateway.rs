//! Persistence gateway trait for pluggable row stores.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::filter::FilterField;
use crate::types::sorting::SortField;

/// A single table row as a JSON object keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Trait for row-store backends (PostgreSQL, in-memory).
///
/// The gateway exposes flat, single-statement table operations only. It
/// offers no multi-statement transactions, so callers that issue several
/// calls must tolerate the partial state left behind by a failed step.
///
/// Multiple filters are combined with `AND`. Backend failures are reported
/// with [`ErrorKind::Gateway`](crate::error::ErrorKind::Gateway).
#[async_trait]
pub trait RowGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Select every row matching `filters`, sorted by `order_by` in turn.
    async fn select_all(
        &self,
        table: &str,
        filters: &[FilterField],
        order_by: &[SortField],
    ) -> AppResult<Vec<Row>>;

    /// Select the first row matching `filters`.
    ///
    /// Fails with `NotFound` when no row matches.
    async fn select_one(&self, table: &str, filters: &[FilterField]) -> AppResult<Row>;

    /// Insert a row and return it as stored.
    async fn insert(&self, table: &str, row: Row) -> AppResult<Row>;

    /// Apply `patch` to every row matching `filters`. Only the columns
    /// present in `patch` are written. Returns the number of rows affected.
    async fn update(&self, table: &str, patch: Row, filters: &[FilterField]) -> AppResult<u64>;

    /// Delete every row matching `filters`. Returns the number of rows
    /// affected. An empty filter list is rejected with `Validation`.
    async fn delete_where(&self, table: &str, filters: &[FilterField]) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

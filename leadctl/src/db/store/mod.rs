//! The persistence gateway seam.
//!
//! [`Store`] abstracts all durable reads and writes for batches, list items,
//! and the read-only agent directory. Handlers depend on `Arc<dyn Store>` so
//! the upload/lifecycle logic is testable without a real database:
//! [`PgStore`] backs the running service, [`MemoryStore`] backs the tests
//! with identical semantics.

use crate::db::errors::Result;
use crate::db::models::{Agent, Batch, BatchCreateDBRequest, BatchStatus, ListItem, ListItemCreateDBRequest, ListItemStatus};
use crate::types::{AgentId, BatchId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage operations for the distribution and batch-lifecycle flows.
///
/// No business rule lives behind this trait: callers decide what to insert,
/// when deletion is allowed, and how status transitions behave.
#[async_trait]
pub trait Store: Send + Sync {
    /// Agent directory in system order (creation order). Read-only here;
    /// agents are managed by an external collaborator.
    async fn list_agents(&self) -> Result<Vec<Agent>>;

    async fn find_agent_by_id(&self, id: AgentId) -> Result<Option<Agent>>;

    /// Bulk-insert the items of one upload. All-or-nothing: a failure on
    /// any row must leave none of them persisted.
    async fn insert_many_list_items(&self, items: &[ListItemCreateDBRequest]) -> Result<u64>;

    async fn find_list_items_by_batch(&self, batch_id: BatchId) -> Result<Vec<ListItem>>;

    async fn find_list_items_by_agent(&self, agent_id: AgentId) -> Result<Vec<ListItem>>;

    /// Count of a batch's items whose status differs from `excluded`
    async fn count_list_items_by_batch_excluding_status(&self, batch_id: BatchId, excluded: ListItemStatus) -> Result<i64>;

    /// Returns the number of items removed
    async fn delete_list_items_by_batch(&self, batch_id: BatchId) -> Result<u64>;

    /// Fails with [`crate::db::errors::DbError::UniqueViolation`] if the
    /// batch id already exists.
    async fn insert_batch(&self, request: &BatchCreateDBRequest) -> Result<Batch>;

    async fn find_batch_by_id(&self, batch_id: BatchId) -> Result<Option<Batch>>;

    /// Set status and completed_at, returning the updated record.
    /// Fails with [`crate::db::errors::DbError::NotFound`] if unknown.
    async fn update_batch(&self, batch_id: BatchId, status: BatchStatus, completed_at: Option<DateTime<Utc>>) -> Result<Batch>;

    /// Returns whether a record was deleted
    async fn delete_batch_record(&self, batch_id: BatchId) -> Result<bool>;

    /// All batches, optionally filtered to one status, newest-created first
    async fn list_batches(&self, status: Option<BatchStatus>) -> Result<Vec<Batch>>;
}

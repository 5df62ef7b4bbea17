use crate::db::errors::{DbError, Result};
use crate::db::models::{Agent, Batch, BatchCreateDBRequest, BatchStatus, ListItem, ListItemCreateDBRequest, ListItemStatus};
use crate::db::store::Store;
use crate::types::{AgentId, BatchId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// SQLx/PostgreSQL-backed store.
///
/// Queries are plain (non-macro) so the crate builds without a live
/// database; schemas live in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_agents(&self) -> Result<Vec<Agent>> {
        let agents = sqlx::query_as::<_, Agent>("SELECT id, name, created_at FROM agents ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(agents)
    }

    async fn find_agent_by_id(&self, id: AgentId) -> Result<Option<Agent>> {
        let agent = sqlx::query_as::<_, Agent>("SELECT id, name, created_at FROM agents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(agent)
    }

    async fn insert_many_list_items(&self, items: &[ListItemCreateDBRequest]) -> Result<u64> {
        // Single transaction: either every item of the upload lands or none
        let mut tx = self.pool.begin().await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO list_items (first_name, phone, notes, agent_id, batch_id)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&item.first_name)
            .bind(&item.phone)
            .bind(&item.notes)
            .bind(item.agent_id)
            .bind(item.batch_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(items.len() as u64)
    }

    async fn find_list_items_by_batch(&self, batch_id: BatchId) -> Result<Vec<ListItem>> {
        let items = sqlx::query_as::<_, ListItem>("SELECT * FROM list_items WHERE batch_id = $1 ORDER BY created_at ASC, id ASC")
            .bind(batch_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn find_list_items_by_agent(&self, agent_id: AgentId) -> Result<Vec<ListItem>> {
        let items = sqlx::query_as::<_, ListItem>("SELECT * FROM list_items WHERE agent_id = $1 ORDER BY created_at ASC, id ASC")
            .bind(agent_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn count_list_items_by_batch_excluding_status(&self, batch_id: BatchId, excluded: ListItemStatus) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM list_items WHERE batch_id = $1 AND status != $2")
            .bind(batch_id)
            .bind(excluded)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete_list_items_by_batch(&self, batch_id: BatchId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM list_items WHERE batch_id = $1")
            .bind(batch_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_batch(&self, request: &BatchCreateDBRequest) -> Result<Batch> {
        let batch = sqlx::query_as::<_, Batch>(
            r#"
            INSERT INTO batches (batch_id, filename, item_count, agents_used, base_items_per_agent, agents_with_extra_item)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.batch_id)
        .bind(&request.filename)
        .bind(request.item_count)
        .bind(request.agents_used)
        .bind(request.base_items_per_agent)
        .bind(request.agents_with_extra_item)
        .fetch_one(&self.pool)
        .await?;
        Ok(batch)
    }

    async fn find_batch_by_id(&self, batch_id: BatchId) -> Result<Option<Batch>> {
        let batch = sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE batch_id = $1")
            .bind(batch_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(batch)
    }

    async fn update_batch(&self, batch_id: BatchId, status: BatchStatus, completed_at: Option<DateTime<Utc>>) -> Result<Batch> {
        let batch = sqlx::query_as::<_, Batch>(
            r#"
            UPDATE batches
            SET status = $2, completed_at = $3
            WHERE batch_id = $1
            RETURNING *
            "#,
        )
        .bind(batch_id)
        .bind(status)
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await?;

        batch.ok_or(DbError::NotFound)
    }

    async fn delete_batch_record(&self, batch_id: BatchId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM batches WHERE batch_id = $1")
            .bind(batch_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_batches(&self, status: Option<BatchStatus>) -> Result<Vec<Batch>> {
        let batches = match status {
            Some(status) => {
                sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE status = $1 ORDER BY created_at DESC")
                    .bind(status)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, Batch>("SELECT * FROM batches ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(batches)
    }
}

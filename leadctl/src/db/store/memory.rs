use crate::db::errors::{DbError, Result};
use crate::db::models::{Agent, Batch, BatchCreateDBRequest, BatchStatus, ListItem, ListItemCreateDBRequest, ListItemStatus};
use crate::db::store::Store;
use crate::types::{AgentId, BatchId, ListItemId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    agents: Vec<Agent>,
    batches: Vec<Batch>,
    items: Vec<ListItem>,
}

/// In-memory store with the same semantics as [`super::PgStore`].
///
/// Used by tests so the upload and lifecycle flows run without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an agent to the directory, preserving system order
    pub async fn add_agent(&self, name: &str) -> Agent {
        let agent = Agent {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.inner.write().await.agents.push(agent.clone());
        agent
    }

    /// Mutate one item's work status, standing in for the agent-facing
    /// collaborators that own item progression in production
    pub async fn set_list_item_status(&self, id: ListItemId, status: ListItemStatus) -> Result<()> {
        let mut inner = self.inner.write().await;
        let item = inner.items.iter_mut().find(|i| i.id == id).ok_or(DbError::NotFound)?;
        item.status = status;
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_agents(&self) -> Result<Vec<Agent>> {
        Ok(self.inner.read().await.agents.clone())
    }

    async fn find_agent_by_id(&self, id: AgentId) -> Result<Option<Agent>> {
        Ok(self.inner.read().await.agents.iter().find(|a| a.id == id).cloned())
    }

    async fn insert_many_list_items(&self, items: &[ListItemCreateDBRequest]) -> Result<u64> {
        let mut inner = self.inner.write().await;

        // Mirror the agent_id foreign key before touching state
        for item in items {
            if !inner.agents.iter().any(|a| a.id == item.agent_id) {
                return Err(DbError::ForeignKeyViolation {
                    constraint: Some("list_items_agent_id_fkey".to_string()),
                    table: Some("list_items".to_string()),
                    message: format!("agent {} does not exist", item.agent_id),
                });
            }
        }

        let now = Utc::now();
        for item in items {
            inner.items.push(ListItem {
                id: Uuid::new_v4(),
                first_name: item.first_name.clone(),
                phone: item.phone.clone(),
                notes: item.notes.clone(),
                agent_id: item.agent_id,
                batch_id: item.batch_id,
                status: ListItemStatus::Pending,
                created_at: now,
            });
        }
        Ok(items.len() as u64)
    }

    async fn find_list_items_by_batch(&self, batch_id: BatchId) -> Result<Vec<ListItem>> {
        Ok(self
            .inner
            .read()
            .await
            .items
            .iter()
            .filter(|i| i.batch_id == batch_id)
            .cloned()
            .collect())
    }

    async fn find_list_items_by_agent(&self, agent_id: AgentId) -> Result<Vec<ListItem>> {
        Ok(self
            .inner
            .read()
            .await
            .items
            .iter()
            .filter(|i| i.agent_id == agent_id)
            .cloned()
            .collect())
    }

    async fn count_list_items_by_batch_excluding_status(&self, batch_id: BatchId, excluded: ListItemStatus) -> Result<i64> {
        Ok(self
            .inner
            .read()
            .await
            .items
            .iter()
            .filter(|i| i.batch_id == batch_id && i.status != excluded)
            .count() as i64)
    }

    async fn delete_list_items_by_batch(&self, batch_id: BatchId) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.items.len();
        inner.items.retain(|i| i.batch_id != batch_id);
        Ok((before - inner.items.len()) as u64)
    }

    async fn insert_batch(&self, request: &BatchCreateDBRequest) -> Result<Batch> {
        let mut inner = self.inner.write().await;
        if inner.batches.iter().any(|b| b.batch_id == request.batch_id) {
            return Err(DbError::UniqueViolation {
                constraint: Some("batches_pkey".to_string()),
                table: Some("batches".to_string()),
                message: format!("batch {} already exists", request.batch_id),
            });
        }

        let batch = Batch {
            batch_id: request.batch_id,
            filename: request.filename.clone(),
            item_count: request.item_count,
            status: BatchStatus::Active,
            agents_used: request.agents_used,
            base_items_per_agent: request.base_items_per_agent,
            agents_with_extra_item: request.agents_with_extra_item,
            created_at: Utc::now(),
            completed_at: None,
        };
        inner.batches.push(batch.clone());
        Ok(batch)
    }

    async fn find_batch_by_id(&self, batch_id: BatchId) -> Result<Option<Batch>> {
        Ok(self.inner.read().await.batches.iter().find(|b| b.batch_id == batch_id).cloned())
    }

    async fn update_batch(&self, batch_id: BatchId, status: BatchStatus, completed_at: Option<DateTime<Utc>>) -> Result<Batch> {
        let mut inner = self.inner.write().await;
        let batch = inner
            .batches
            .iter_mut()
            .find(|b| b.batch_id == batch_id)
            .ok_or(DbError::NotFound)?;
        batch.status = status;
        batch.completed_at = completed_at;
        Ok(batch.clone())
    }

    async fn delete_batch_record(&self, batch_id: BatchId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.batches.len();
        inner.batches.retain(|b| b.batch_id != batch_id);
        Ok(inner.batches.len() < before)
    }

    async fn list_batches(&self, status: Option<BatchStatus>) -> Result<Vec<Batch>> {
        let mut batches: Vec<Batch> = self
            .inner
            .read()
            .await
            .batches
            .iter()
            .filter(|b| status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        batches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_request(batch_id: BatchId, item_count: i64) -> BatchCreateDBRequest {
        BatchCreateDBRequest {
            batch_id,
            filename: "leads.csv".to_string(),
            item_count,
            agents_used: 5,
            base_items_per_agent: item_count / 5,
            agents_with_extra_item: (item_count % 5) as i32,
        }
    }

    fn item_request(agent_id: AgentId, batch_id: BatchId) -> ListItemCreateDBRequest {
        ListItemCreateDBRequest {
            first_name: "Ada".to_string(),
            phone: "5550100".to_string(),
            notes: "".to_string(),
            agent_id,
            batch_id,
        }
    }

    #[tokio::test]
    async fn duplicate_batch_id_is_a_unique_violation() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store.insert_batch(&batch_request(id, 5)).await.unwrap();

        let err = store.insert_batch(&batch_request(id, 5)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn unknown_agent_reference_is_rejected() {
        let store = MemoryStore::new();
        let err = store
            .insert_many_list_items(&[item_request(Uuid::new_v4(), Uuid::new_v4())])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(store.inner.read().await.items.is_empty());
    }

    #[tokio::test]
    async fn count_excludes_the_given_status() {
        let store = MemoryStore::new();
        let agent = store.add_agent("a1").await;
        let batch_id = Uuid::new_v4();
        store
            .insert_many_list_items(&[
                item_request(agent.id, batch_id),
                item_request(agent.id, batch_id),
                item_request(agent.id, batch_id),
            ])
            .await
            .unwrap();

        let items = store.find_list_items_by_batch(batch_id).await.unwrap();
        store
            .set_list_item_status(items[0].id, ListItemStatus::Completed)
            .await
            .unwrap();

        let remaining = store
            .count_list_items_by_batch_excluding_status(batch_id, ListItemStatus::Completed)
            .await
            .unwrap();
        assert_eq!(remaining, 2);
    }

    #[tokio::test]
    async fn update_batch_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_batch(Uuid::new_v4(), BatchStatus::Completed, Some(Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }

    #[tokio::test]
    async fn list_batches_filters_and_orders_newest_first() {
        let store = MemoryStore::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        store.insert_batch(&batch_request(first, 5)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.insert_batch(&batch_request(second, 10)).await.unwrap();

        store.update_batch(first, BatchStatus::Archived, Some(Utc::now())).await.unwrap();

        let all = store.list_batches(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].batch_id, second);

        let archived = store.list_batches(Some(BatchStatus::Archived)).await.unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].batch_id, first);
    }
}

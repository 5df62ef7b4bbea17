//! Wire models for the upload and list-item endpoints.

use crate::db::models::{ListItem, ListItemStatus};
use crate::ingest::DistributionPlan;
use crate::types::{AgentId, BatchId, ListItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Successful upload summary
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Uuid)]
    pub batch_id: BatchId,
    pub total_items: usize,
    pub distribution: DistributionSummary,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    pub agents_used: usize,
    pub base_items_per_agent: usize,
    pub agents_with_extra_item: usize,
    pub distribution_details: Vec<DistributionDetail>,
}

/// One agent's share; `agent_index` is 1-based in agent order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributionDetail {
    pub agent_index: usize,
    pub item_count: usize,
}

impl UploadResponse {
    pub fn from_plan(plan: &DistributionPlan) -> Self {
        Self {
            success: true,
            message: "List uploaded and distributed successfully".to_string(),
            batch_id: plan.batch_id,
            total_items: plan.total_items(),
            distribution: DistributionSummary {
                agents_used: plan.shares.len(),
                base_items_per_agent: plan.base_items_per_agent,
                agents_with_extra_item: plan.agents_with_extra_item,
                distribution_details: plan
                    .shares
                    .iter()
                    .enumerate()
                    .map(|(i, share)| DistributionDetail {
                        agent_index: i + 1,
                        item_count: share.item_count,
                    })
                    .collect(),
            },
        }
    }
}

/// One lead as exposed over the wire
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListItemView {
    #[schema(value_type = Uuid)]
    pub id: ListItemId,
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    #[schema(value_type = Uuid)]
    pub agent: AgentId,
    #[schema(value_type = Uuid)]
    pub batch_id: BatchId,
    pub status: ListItemStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&ListItem> for ListItemView {
    fn from(item: &ListItem) -> Self {
        Self {
            id: item.id,
            first_name: item.first_name.clone(),
            phone: item.phone.clone(),
            notes: item.notes.clone(),
            agent: item.agent_id,
            batch_id: item.batch_id,
            status: item.status,
            created_at: item.created_at,
        }
    }
}

/// Items of one batch
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemsResponse {
    pub success: bool,
    pub count: usize,
    #[schema(value_type = Uuid)]
    pub batch_id: BatchId,
    pub list_items: Vec<ListItemView>,
}

/// Items assigned to one agent
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentItemsResponse {
    pub success: bool,
    pub count: usize,
    pub lists: Vec<ListItemView>,
}

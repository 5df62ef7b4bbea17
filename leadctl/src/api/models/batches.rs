//! Wire models for the batch lifecycle endpoints.

use crate::db::models::{Batch, BatchStatus};
use crate::types::BatchId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// One batch as exposed over the wire
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchView {
    #[schema(value_type = Uuid)]
    pub batch_id: BatchId,
    pub filename: String,
    pub item_count: i64,
    pub status: BatchStatus,
    pub distribution: BatchDistributionView,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchDistributionView {
    pub agents_used: i32,
    pub base_items_per_agent: i64,
    pub agents_with_extra_item: i32,
}

impl From<&Batch> for BatchView {
    fn from(batch: &Batch) -> Self {
        Self {
            batch_id: batch.batch_id,
            filename: batch.filename.clone(),
            item_count: batch.item_count,
            status: batch.status,
            distribution: BatchDistributionView {
                agents_used: batch.agents_used,
                base_items_per_agent: batch.base_items_per_agent,
                agents_with_extra_item: batch.agents_with_extra_item,
            },
            created_at: batch.created_at,
            completed_at: batch.completed_at,
        }
    }
}

/// Query parameters for listing batches
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBatchesQuery {
    /// Optional status filter: active | completed | archived
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListBatchesResponse {
    pub success: bool,
    pub count: usize,
    pub batches: Vec<BatchView>,
}

/// Request body for a batch status update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateBatchStatusRequest {
    /// One of: active | completed | archived
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatchStatusResponse {
    pub success: bool,
    pub message: String,
    pub batch: BatchView,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBatchResponse {
    pub success: bool,
    pub message: String,
}

use crate::types::{AgentId, BatchId, ListItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Work status of one lead, mutated by the agent-facing collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "list_item_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListItemStatus {
    Pending,
    Completed,
    Cancelled,
}

impl fmt::Display for ListItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListItemStatus::Pending => write!(f, "pending"),
            ListItemStatus::Completed => write!(f, "completed"),
            ListItemStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for ListItemStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ListItemStatus::Pending),
            "completed" => Ok(ListItemStatus::Completed),
            "cancelled" => Ok(ListItemStatus::Cancelled),
            _ => Err(format!("Unknown list item status: {}", s)),
        }
    }
}

/// One lead assigned to one agent within one batch.
///
/// `batch_id` is a denormalized grouping key shared by all items of an
/// upload; items are independently queryable by agent or by batch.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ListItem {
    pub id: ListItemId,
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub agent_id: AgentId,
    pub batch_id: BatchId,
    pub status: ListItemStatus,
    pub created_at: DateTime<Utc>,
}

/// Storage request for one item of a bulk insert
#[derive(Debug, Clone)]
pub struct ListItemCreateDBRequest {
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub agent_id: AgentId,
    pub batch_id: BatchId,
}

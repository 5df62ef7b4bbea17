use crate::types::BatchId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Batch lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "batch_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Initial state, set at creation
    Active,
    /// Work on the batch finished; sets completed_at
    Completed,
    /// Batch retired from view; sets completed_at
    Archived,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Active => write!(f, "active"),
            BatchStatus::Completed => write!(f, "completed"),
            BatchStatus::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for BatchStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(BatchStatus::Active),
            "completed" => Ok(BatchStatus::Completed),
            "archived" => Ok(BatchStatus::Archived),
            _ => Err(format!("Unknown batch status: {}", s)),
        }
    }
}

impl BatchStatus {
    /// Whether entering this status stamps `completed_at`
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Archived)
    }
}

/// The aggregate record of one upload-and-distribution operation.
///
/// `item_count` equals the number of list items inserted for this batch id,
/// and `base_items_per_agent * agents_used + agents_with_extra_item`
/// reproduces it exactly.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Batch {
    pub batch_id: BatchId,
    pub filename: String,
    pub item_count: i64,
    pub status: BatchStatus,
    pub agents_used: i32,
    pub base_items_per_agent: i64,
    pub agents_with_extra_item: i32,
    pub created_at: DateTime<Utc>,
    /// Set when status becomes completed or archived; cleared on active
    pub completed_at: Option<DateTime<Utc>>,
}

/// Storage request for creating a new batch record
#[derive(Debug, Clone)]
pub struct BatchCreateDBRequest {
    pub batch_id: BatchId,
    pub filename: String,
    pub item_count: i64,
    pub agents_used: i32,
    pub base_items_per_agent: i64,
    pub agents_with_extra_item: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for s in ["active", "completed", "archived"] {
            assert_eq!(BatchStatus::from_str(s).unwrap().to_string(), s);
        }
        assert!(BatchStatus::from_str("deleted").is_err());
        assert!(BatchStatus::from_str("Active").is_err());
    }

    #[test]
    fn terminal_statuses_stamp_completed_at() {
        assert!(!BatchStatus::Active.is_terminal());
        assert!(BatchStatus::Completed.is_terminal());
        assert!(BatchStatus::Archived.is_terminal());
    }
}

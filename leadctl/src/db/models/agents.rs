use crate::types::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the agent directory.
///
/// Agents are created and maintained by an external back-office service;
/// this crate only reads them in system order to pick distribution targets.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

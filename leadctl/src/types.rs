//! Common type aliases for entity identifiers.
//!
//! All entity IDs are UUIDs wrapped in type aliases:
//!
//! - [`AgentId`]: field agent identifier (owned by the external agent service)
//! - [`BatchId`]: one upload-and-distribution operation
//! - [`ListItemId`]: one lead record assigned to an agent

use uuid::Uuid;

pub type AgentId = Uuid;
pub type BatchId = Uuid;
pub type ListItemId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_to_first_segment() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(abbrev_uuid(&id), "550e8400");
    }
}

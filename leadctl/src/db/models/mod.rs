pub mod agents;
pub mod batches;
pub mod list_items;

pub use agents::Agent;
pub use batches::{Batch, BatchCreateDBRequest, BatchStatus};
pub use list_items::{ListItem, ListItemCreateDBRequest, ListItemStatus};

pub mod batches;
pub mod lists;

//! Storage layer for batches, list items, and the agent directory.
//!
//! All durable reads and writes go through the [`store::Store`] seam. Two
//! implementations exist: [`store::PgStore`] over SQLx/PostgreSQL for the
//! running service, and [`store::MemoryStore`] for tests. No business rule
//! lives here; upload distribution and batch lifecycle decisions are made
//! by the handlers and the `ingest` engine.
//!
//! # Modules
//!
//! - [`store`]: the persistence gateway trait and its implementations
//! - [`models`]: storage record structures matching the table schemas
//! - [`errors`]: storage-specific error types
//!
//! Migrations live in `migrations/` and run on startup via
//! [`crate::migrator`].

pub mod errors;
pub mod models;
pub mod store;

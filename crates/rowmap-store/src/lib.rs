//! rowmap store - SQLite execution layer
//!
//! Provides:
//! - Connection open/configure driven by `DbConfig`
//! - Statement execution and row scanning over rusqlite
//! - `Repository`: CRUD, fluent queries, transactions and lifecycle hooks
//! - `Context`: caller-owned cancellation and deadlines

pub mod config;
pub mod context;
pub mod db;
pub mod errors;
pub mod exec;
pub mod repo;

// Re-export key types
pub use config::DbConfig;
pub use context::{CancelHandle, Context};
pub use errors::Result;
pub use repo::{Query, Repository};

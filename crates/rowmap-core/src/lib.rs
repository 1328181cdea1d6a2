//! rowmap core - entity metadata, SQL dialects and statement rendering
//!
//! This crate holds everything that does not touch a live connection:
//! - Entity declaration contracts and lifecycle hooks
//! - Schema registry turning field annotations into canonical metadata
//! - Dialect strategies (SQLite, PostgreSQL, MySQL) for quoting, placeholders and DDL
//! - Fluent query builder and INSERT/UPDATE/DELETE rendering
//! - Error taxonomy with stable codes and the structured logging facility
//!
//! Execution against a database lives in `rowmap-store`.

pub mod dialect;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod query;
pub mod registry;

pub use rowmap_core_types::schema;

// Re-export commonly used types
pub use dialect::{Dialect, MysqlDialect, PostgresDialect, SqliteDialect};
pub use errors::{ErrorKind, OrmError, Result};
pub use model::{Entity, EntityMetadata, FieldDecl, FieldKind, FieldValue, Hooks, Value};
pub use query::{QueryBuilder, Statement};
pub use registry::SchemaRegistry;

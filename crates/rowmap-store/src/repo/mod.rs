//! Repository layer: entity CRUD, fluent queries and transactions over a
//! rusqlite connection

pub mod materialize;
pub mod query;
pub mod repository;

pub use query::Query;
pub use repository::Repository;

//! SQL dialects (Strategy pattern).
//!
//! Every database-flavor-specific piece of text lives behind [`Dialect`]:
//! identifier quoting, parameter placeholders, column types and DDL. The
//! query builder and repository only ever talk to this trait.
//!
//! # Available Dialects
//!
//! - [`SqliteDialect`]: `?` placeholders, double-quoted identifiers
//! - [`PostgresDialect`]: `$n` placeholders, double-quoted identifiers
//! - [`MysqlDialect`]: `?` placeholders, backtick identifiers

mod mysql;
mod postgres;
mod sqlite;

use std::sync::Arc;

use crate::model::{EntityMetadata, FieldMetadata};

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

/// SQL syntax strategy for one database engine
///
/// Implementations are immutable and shared freely between repositories and
/// threads.
pub trait Dialect: Send + Sync + std::fmt::Debug {
    /// Stable dialect identifier (e.g., "sqlite", "postgres").
    fn name(&self) -> &'static str;

    /// Parameter placeholder for the given 1-based position.
    ///
    /// - SQLite/MySQL: `?`
    /// - PostgreSQL: `$1`, `$2`, ...
    fn placeholder(&self, index: usize) -> String;

    /// Quote a table or column name without changing its case.
    fn quote_identifier(&self, name: &str) -> String;

    /// Physical column type for a field, honoring an explicit `type:` override.
    fn data_type(&self, field: &FieldMetadata) -> String;

    /// Keyword appended after `PRIMARY KEY` for an auto-increment key.
    fn auto_increment_keyword(&self, field: &FieldMetadata) -> Option<&'static str>;

    /// Quote a possibly qualified column reference (`users.id`).
    fn quote_column(&self, reference: &str) -> String {
        reference
            .split('.')
            .map(|part| {
                if part == "*" {
                    part.to_string()
                } else {
                    self.quote_identifier(part)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// One column definition inside CREATE TABLE.
    fn column_definition(&self, field: &FieldMetadata) -> String {
        let mut def = format!(
            "{} {}",
            self.quote_identifier(&field.column_name),
            self.data_type(field)
        );

        if !field.is_nullable {
            def.push_str(" NOT NULL");
        }
        if field.is_primary_key {
            def.push_str(" PRIMARY KEY");
            if field.is_auto_increment {
                if let Some(keyword) = self.auto_increment_keyword(field) {
                    def.push(' ');
                    def.push_str(keyword);
                }
            }
        } else if field.is_unique {
            def.push_str(" UNIQUE");
        }
        if let Some(default) = &field.default_value {
            def.push_str(" DEFAULT ");
            def.push_str(default);
        }

        def
    }

    /// Idempotent CREATE TABLE for an entity's stored columns.
    fn create_table_sql(&self, meta: &EntityMetadata) -> String {
        let columns = meta
            .columns()
            .map(|f| self.column_definition(f))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.quote_identifier(&meta.table_name),
            columns
        )
    }

    /// Idempotent DROP TABLE.
    fn drop_table_sql(&self, meta: &EntityMetadata) -> String {
        format!(
            "DROP TABLE IF EXISTS {}",
            self.quote_identifier(&meta.table_name)
        )
    }

    /// One CREATE INDEX per `index` field.
    fn create_index_sqls(&self, meta: &EntityMetadata) -> Vec<String> {
        meta.columns()
            .filter(|f| f.is_indexed)
            .map(|f| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                    self.quote_identifier(&format!("idx_{}_{}", meta.table_name, f.column_name)),
                    self.quote_identifier(&meta.table_name),
                    self.quote_identifier(&f.column_name)
                )
            })
            .collect()
    }

    /// LIMIT/OFFSET suffix (with leading space), empty when neither is set.
    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = String::new();
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
        sql
    }

    /// Suffix that makes an INSERT return the generated key, for dialects
    /// whose drivers have no last-insert-id call.
    fn returning_clause(&self, _primary_key: &FieldMetadata) -> Option<String> {
        None
    }
}

/// Look up a built-in dialect by its stable name
pub fn by_name(name: &str) -> Option<Arc<dyn Dialect>> {
    match name.to_ascii_lowercase().as_str() {
        "sqlite" | "sqlite3" => Some(Arc::new(SqliteDialect::new())),
        "postgres" | "postgresql" | "pg" => Some(Arc::new(PostgresDialect::new())),
        "mysql" | "mariadb" => Some(Arc::new(MysqlDialect::new())),
        _ => None,
    }
}

/// Quote with `quote`, doubling any embedded quote characters
pub(crate) fn quote_with(name: &str, quote: char) -> String {
    let escaped = name.replace(quote, &format!("{quote}{quote}"));
    format!("{quote}{escaped}{quote}")
}

//! SQLite SQL dialect.

use super::{quote_with, Dialect};
use crate::model::{FieldKind, FieldMetadata};

/// SQLite dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '"')
    }

    fn data_type(&self, field: &FieldMetadata) -> String {
        if let Some(explicit) = &field.column_type {
            return explicit.clone();
        }
        // AUTOINCREMENT is only legal on exactly `INTEGER PRIMARY KEY`
        let ty = match field.kind {
            FieldKind::Int32 | FieldKind::Int64 | FieldKind::UInt32 | FieldKind::UInt64 => {
                "INTEGER"
            }
            FieldKind::Float => "REAL",
            FieldKind::Bool => "BOOLEAN",
            FieldKind::Timestamp => "DATETIME",
            FieldKind::Blob => "BLOB",
            FieldKind::Text
            | FieldKind::Uuid
            | FieldKind::Json
            | FieldKind::Relation
            | FieldKind::Other => "TEXT",
        };
        ty.to_string()
    }

    fn auto_increment_keyword(&self, _field: &FieldMetadata) -> Option<&'static str> {
        Some("AUTOINCREMENT")
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            // SQLite only accepts OFFSET after a LIMIT
            (None, Some(offset)) => format!(" LIMIT -1 OFFSET {}", offset),
            (Some(limit), Some(offset)) => format!(" LIMIT {} OFFSET {}", limit, offset),
            (Some(limit), None) => format!(" LIMIT {}", limit),
            (None, None) => String::new(),
        }
    }
}

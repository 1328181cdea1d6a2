//! MySQL/MariaDB SQL dialect.

use super::{quote_with, Dialect};
use crate::model::{FieldKind, FieldMetadata};

/// MySQL/MariaDB dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '`')
    }

    fn data_type(&self, field: &FieldMetadata) -> String {
        if let Some(explicit) = &field.column_type {
            return explicit.clone();
        }
        let ty = match field.kind {
            FieldKind::Text => "VARCHAR(255)",
            FieldKind::Int32 => "INT",
            FieldKind::Int64 => "BIGINT",
            FieldKind::UInt32 => "INT UNSIGNED",
            FieldKind::UInt64 => "BIGINT UNSIGNED",
            FieldKind::Float => "DOUBLE",
            FieldKind::Bool => "BOOLEAN",
            FieldKind::Timestamp => "DATETIME",
            FieldKind::Blob => "BLOB",
            FieldKind::Uuid => "CHAR(36)",
            FieldKind::Json => "JSON",
            FieldKind::Relation | FieldKind::Other => "TEXT",
        };
        ty.to_string()
    }

    fn auto_increment_keyword(&self, _field: &FieldMetadata) -> Option<&'static str> {
        Some("AUTO_INCREMENT")
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            // MySQL's documented "all remaining rows" limit
            (None, Some(offset)) => format!(" LIMIT {} OFFSET {}", u64::MAX, offset),
            (Some(limit), Some(offset)) => format!(" LIMIT {} OFFSET {}", limit, offset),
            (Some(limit), None) => format!(" LIMIT {}", limit),
            (None, None) => String::new(),
        }
    }
}

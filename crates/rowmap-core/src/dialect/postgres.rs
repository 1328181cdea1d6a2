//! PostgreSQL SQL dialect.

use super::{quote_with, Dialect};
use crate::model::{FieldKind, FieldMetadata};

/// PostgreSQL dialect implementation.
///
/// Auto-increment keys become `SERIAL`/`BIGSERIAL` columns, or identity
/// columns when the key has an explicit `type:`. Generated keys are read
/// back with `RETURNING`.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '"')
    }

    fn data_type(&self, field: &FieldMetadata) -> String {
        if let Some(explicit) = &field.column_type {
            return explicit.clone();
        }
        if field.is_primary_key && field.is_auto_increment && field.kind.is_integer() {
            return if field.kind.is_wide_integer() {
                "BIGSERIAL".to_string()
            } else {
                "SERIAL".to_string()
            };
        }
        let ty = match field.kind {
            FieldKind::Text => "VARCHAR(255)",
            FieldKind::Int32 => "INTEGER",
            FieldKind::Int64 | FieldKind::UInt32 | FieldKind::UInt64 => "BIGINT",
            FieldKind::Float => "DOUBLE PRECISION",
            FieldKind::Bool => "BOOLEAN",
            FieldKind::Timestamp => "TIMESTAMP",
            FieldKind::Blob => "BYTEA",
            FieldKind::Uuid => "UUID",
            FieldKind::Json => "JSONB",
            FieldKind::Relation | FieldKind::Other => "TEXT",
        };
        ty.to_string()
    }

    // SERIAL carries its own sequence; an explicit type needs an identity
    fn auto_increment_keyword(&self, field: &FieldMetadata) -> Option<&'static str> {
        field
            .column_type
            .as_ref()
            .map(|_| "GENERATED BY DEFAULT AS IDENTITY")
    }

    fn returning_clause(&self, primary_key: &FieldMetadata) -> Option<String> {
        Some(format!(
            " RETURNING {}",
            self.quote_identifier(&primary_key.column_name)
        ))
    }
}

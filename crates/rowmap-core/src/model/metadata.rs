use std::any::TypeId;

use serde::Serialize;

use crate::errors::{OrmError, Result};

use super::field::FieldMetadata;
use super::relation::RelationMetadata;

/// Canonical storage shape of one registered entity type
///
/// Built once by the schema registry and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityMetadata {
    #[serde(skip)]
    pub type_id: TypeId,
    pub type_name: String,
    pub table_name: String,
    /// Declaration order is preserved
    pub fields: Vec<FieldMetadata>,
    /// Index into `fields`
    pub primary_key: Option<usize>,
    pub relations: Vec<RelationMetadata>,
}

impl EntityMetadata {
    /// The primary key field, if one is declared
    pub fn primary_key(&self) -> Option<&FieldMetadata> {
        self.primary_key.and_then(|idx| self.fields.get(idx))
    }

    /// The primary key field, or the declared `NoPrimaryKey` error
    pub fn require_primary_key(&self) -> Result<&FieldMetadata> {
        self.primary_key().ok_or_else(|| OrmError::NoPrimaryKey {
            table: self.table_name.clone(),
        })
    }

    /// Stored columns in declaration order (relation fields excluded)
    pub fn columns(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.fields.iter().filter(|f| f.is_column())
    }

    /// Columns written by an INSERT (auto-increment primary key excluded)
    pub fn insert_columns(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.columns()
            .filter(|f| !(f.is_primary_key && f.is_auto_increment))
    }

    /// Columns written by an UPDATE's SET clause
    pub fn update_columns(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.columns().filter(|f| !f.is_primary_key)
    }

    pub fn field_by_column(&self, column: &str) -> Option<&FieldMetadata> {
        self.columns().find(|f| f.column_name == column)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }
}

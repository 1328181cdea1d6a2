use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::relation::{RelationMetadata, RelationTarget};
use super::value::FieldValue;

/// Declared data kind of a field, used to infer its column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    /// Signed or unsigned integers that fit in 32 signed bits
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float,
    Bool,
    Timestamp,
    Blob,
    Uuid,
    Json,
    /// Relation-only field (not a stored column)
    Relation,
    /// Anything the dialects have no mapping for
    Other,
}

impl FieldKind {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldKind::Int32 | FieldKind::Int64 | FieldKind::UInt32 | FieldKind::UInt64
        )
    }

    /// Integer kinds that need 64-bit storage
    pub fn is_wide_integer(&self) -> bool {
        matches!(
            self,
            FieldKind::Int64 | FieldKind::UInt32 | FieldKind::UInt64
        )
    }
}

/// A field as declared by an entity, before its annotation is parsed
///
/// Build with [`FieldDecl::of`] for scalar fields or [`FieldDecl::relation`]
/// for relation-only fields.
///
/// ```
/// use rowmap_core::model::{FieldDecl, FieldKind};
///
/// let decl = FieldDecl::of::<u64>("id").tag("primaryKey;autoIncrement");
/// assert_eq!(decl.kind, FieldKind::UInt64);
/// assert_eq!(decl.tag, Some("primaryKey;autoIncrement"));
/// ```
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: &'static str,
    pub kind: FieldKind,
    pub tag: Option<&'static str>,
    pub column: Option<&'static str>,
    pub target: Option<RelationTarget>,
}

impl FieldDecl {
    /// Declare a scalar field whose kind follows its Rust type
    pub fn of<T: FieldValue>(name: &'static str) -> Self {
        Self::with_kind(name, T::KIND)
    }

    /// Declare a scalar field with an explicit kind
    pub fn with_kind(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            tag: None,
            column: None,
            target: None,
        }
    }

    /// Declare a relation-only field pointing at entity `T`
    pub fn relation<T: Entity>(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Relation,
            tag: None,
            column: None,
            target: Some(RelationTarget::of::<T>()),
        }
    }

    /// Attach the annotation string
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Override the derived column name
    pub fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }
}

/// Canonical description of one persisted field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMetadata {
    pub name: String,
    pub column_name: String,
    pub kind: FieldKind,
    /// Explicit `type:` override; dialects infer from `kind` when absent
    pub column_type: Option<String>,
    pub is_primary_key: bool,
    pub is_auto_increment: bool,
    pub is_unique: bool,
    pub is_indexed: bool,
    pub is_nullable: bool,
    pub default_value: Option<String>,
    pub relation: Option<RelationMetadata>,
}

impl FieldMetadata {
    /// Plain column with default options
    pub fn new(name: impl Into<String>, column_name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            column_name: column_name.into(),
            kind,
            column_type: None,
            is_primary_key: false,
            is_auto_increment: false,
            is_unique: false,
            is_indexed: false,
            is_nullable: true,
            default_value: None,
            relation: None,
        }
    }

    /// Whether the field is a stored column (not a relation edge)
    pub fn is_column(&self) -> bool {
        self.relation.is_none()
    }
}

use std::any::TypeId;

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Kind of relationship edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationKind {
    /// Parse the annotation spelling (`OneToMany`, ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OneToOne" => Some(RelationKind::OneToOne),
            "OneToMany" => Some(RelationKind::OneToMany),
            "ManyToOne" => Some(RelationKind::ManyToOne),
            "ManyToMany" => Some(RelationKind::ManyToMany),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::OneToOne => "OneToOne",
            RelationKind::OneToMany => "OneToMany",
            RelationKind::ManyToOne => "ManyToOne",
            RelationKind::ManyToMany => "ManyToMany",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the entity a relation points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationTarget {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub table_name: &'static str,
}

impl RelationTarget {
    pub fn of<T: Entity>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            table_name: T::table_name(),
        }
    }
}

impl Serialize for RelationTarget {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // TypeId has no stable representation; consumers key on the table
        serializer.serialize_str(self.table_name)
    }
}

/// One relationship edge; descriptive only, never resolved by queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationMetadata {
    pub kind: RelationKind,
    pub target: RelationTarget,
    /// Field name holding the link (required unless ManyToMany)
    pub foreign_key: Option<String>,
    /// ManyToMany only
    pub join_table: Option<String>,
    /// ManyToMany only
    pub reference_key: Option<String>,
}

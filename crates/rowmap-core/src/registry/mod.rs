//! Schema registry
//!
//! Converts an entity's declared fields into [`EntityMetadata`] exactly once
//! and makes it discoverable by type.
//!
//! The process-wide registry ([`SchemaRegistry::global`]) is meant to be
//! populated during startup and read afterwards. Registering while other
//! threads are reading is safe but unsupported as a steady-state pattern:
//! callers are responsible for finishing registration before serving
//! traffic. Tests should build their own `SchemaRegistry::new()` instead of
//! touching the global one.

pub mod naming;
pub mod tag;

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::errors::{OrmError, Result};
use crate::model::{
    Entity, EntityMetadata, FieldDecl, FieldKind, FieldMetadata, RelationKind, RelationMetadata,
};
use crate::schema::OP_REGISTER;

use self::naming::to_snake_case;
use self::tag::{is_skip, parse_tag};

/// Map from entity type to its metadata
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    entries: RwLock<HashMap<TypeId, Arc<EntityMetadata>>>,
}

static GLOBAL_REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

impl SchemaRegistry {
    /// An empty, isolated registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static SchemaRegistry {
        GLOBAL_REGISTRY.get_or_init(SchemaRegistry::new)
    }

    /// Build and store the metadata for `E`
    ///
    /// Registering a type twice returns the metadata built the first time.
    ///
    /// # Errors
    /// * `InvalidTag` - malformed annotation
    /// * `DuplicatePrimaryKey` - more than one `primaryKey`
    /// * `IncompleteRelation` - relation missing `foreignKey`, or a
    ///   ManyToMany missing `joinTable`/`referenceKey`
    /// * `DuplicateColumn` - two fields map to the same column
    pub fn register<E: Entity>(&self) -> Result<Arc<EntityMetadata>> {
        let type_id = TypeId::of::<E>();
        if let Some(existing) = self.get_by_type_id(type_id) {
            return Ok(existing);
        }

        let meta = match build_metadata::<E>() {
            Ok(meta) => Arc::new(meta),
            Err(err) => {
                tracing::warn!(
                    component = module_path!(),
                    op = OP_REGISTER,
                    entity = std::any::type_name::<E>(),
                    err_code = err.code(),
                    error = %err,
                    "entity registration rejected"
                );
                return Err(err);
            }
        };

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let stored = entries.entry(type_id).or_insert_with(|| Arc::clone(&meta));
        tracing::debug!(
            component = module_path!(),
            op = OP_REGISTER,
            entity = %stored.type_name,
            table = %stored.table_name,
            fields = stored.fields.len(),
            "entity registered"
        );
        Ok(Arc::clone(stored))
    }

    /// Register using an instance; only its type is inspected
    pub fn register_entity<E: Entity>(&self, _instance: &E) -> Result<Arc<EntityMetadata>> {
        self.register::<E>()
    }

    /// Metadata for `E`, if registered
    pub fn get<E: Entity>(&self) -> Option<Arc<EntityMetadata>> {
        self.get_by_type_id(TypeId::of::<E>())
    }

    /// Metadata for `E`, or the declared `NotRegistered` error
    pub fn require<E: Entity>(&self) -> Result<Arc<EntityMetadata>> {
        self.get::<E>().ok_or_else(|| OrmError::NotRegistered {
            type_name: std::any::type_name::<E>().to_string(),
        })
    }

    pub fn get_by_type_id(&self, type_id: TypeId) -> Option<Arc<EntityMetadata>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }

    /// All registered metadata, ordered by table name
    pub fn entities(&self) -> Vec<Arc<EntityMetadata>> {
        let mut all: Vec<_> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort_by(|a, b| a.table_name.cmp(&b.table_name));
        all
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build metadata from `E`'s declared fields
pub fn build_metadata<E: Entity>() -> Result<EntityMetadata> {
    let type_name = std::any::type_name::<E>();
    let entity = short_type_name(type_name);
    let mut fields = Vec::new();
    let mut relations = Vec::new();
    let mut primary_key: Option<usize> = None;
    let mut columns = HashSet::new();

    for decl in E::fields() {
        let Some(tag) = decl.tag else {
            continue;
        };
        if is_skip(tag) {
            continue;
        }

        let field = build_field(entity, &decl, tag)?;

        if field.is_primary_key {
            if let Some(first) = primary_key {
                return Err(OrmError::DuplicatePrimaryKey {
                    entity: entity.to_string(),
                    first: fields
                        .get(first)
                        .map(|f: &FieldMetadata| f.name.clone())
                        .unwrap_or_default(),
                    second: field.name.clone(),
                });
            }
            primary_key = Some(fields.len());
        }

        if field.is_column() && !columns.insert(field.column_name.clone()) {
            return Err(OrmError::DuplicateColumn {
                entity: entity.to_string(),
                column: field.column_name.clone(),
            });
        }

        if let Some(relation) = &field.relation {
            relations.push(relation.clone());
        }
        fields.push(field);
    }

    Ok(EntityMetadata {
        type_id: TypeId::of::<E>(),
        type_name: entity.to_string(),
        table_name: E::table_name().to_string(),
        fields,
        primary_key,
        relations,
    })
}

fn build_field(entity: &str, decl: &FieldDecl, tag: &str) -> Result<FieldMetadata> {
    let invalid = |reason: String| OrmError::InvalidTag {
        entity: entity.to_string(),
        field: decl.name.to_string(),
        reason,
    };
    let incomplete = |reason: &str| OrmError::IncompleteRelation {
        entity: entity.to_string(),
        field: decl.name.to_string(),
        reason: reason.to_string(),
    };

    let parsed = parse_tag(tag).map_err(invalid)?;

    let column_name = decl
        .column
        .map(str::to_string)
        .unwrap_or_else(|| to_snake_case(decl.name));

    let mut field = FieldMetadata::new(decl.name, column_name, decl.kind);
    field.column_type = parsed.column_type;
    field.is_primary_key = parsed.primary_key;
    field.is_auto_increment = parsed.auto_increment;
    field.is_unique = parsed.unique;
    field.is_indexed = parsed.index;
    field.is_nullable = !parsed.not_null;
    field.default_value = parsed.default_value;

    let has_link_options = parsed.foreign_key.is_some()
        || parsed.join_table.is_some()
        || parsed.reference_key.is_some();

    match (parsed.relation, decl.target) {
        (Some(kind), Some(target)) => {
            if field.is_primary_key {
                return Err(invalid("a relation field cannot be the primary key".into()));
            }
            match kind {
                RelationKind::ManyToMany => {
                    if parsed.join_table.is_none() {
                        return Err(incomplete("ManyToMany requires joinTable"));
                    }
                    if parsed.reference_key.is_none() {
                        return Err(incomplete("ManyToMany requires referenceKey"));
                    }
                }
                _ => {
                    if parsed.foreign_key.is_none() {
                        return Err(incomplete("relation requires foreignKey"));
                    }
                    if parsed.join_table.is_some() || parsed.reference_key.is_some() {
                        return Err(invalid(
                            "joinTable/referenceKey only apply to ManyToMany".into(),
                        ));
                    }
                }
            }
            field.relation = Some(RelationMetadata {
                kind,
                target,
                foreign_key: parsed.foreign_key,
                join_table: parsed.join_table,
                reference_key: parsed.reference_key,
            });
        }
        (Some(_), None) => {
            return Err(invalid(
                "relation option on a field not declared with FieldDecl::relation".into(),
            ));
        }
        (None, Some(_)) => {
            return Err(incomplete("relation field is missing the relation option"));
        }
        (None, None) => {
            if has_link_options {
                return Err(invalid(
                    "foreignKey/joinTable/referenceKey require a relation option".into(),
                ));
            }
        }
    }

    debug_assert!(field.relation.is_none() || field.kind == FieldKind::Relation);
    Ok(field)
}

fn short_type_name(full: &'static str) -> &'static str {
    // `my_app::model::User` -> `User`; generics keep their full path
    if full.contains('<') {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}

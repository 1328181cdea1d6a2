#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{AuditLine, Post, Role, User};
use rowmap_core::errors::ErrorKind;
use rowmap_core::model::{Entity, FieldDecl, FieldKind, Hooks, RelationKind};
use rowmap_core::SchemaRegistry;

#[test]
fn test_register_builds_columns_in_declaration_order() {
    let registry = SchemaRegistry::new();
    let meta = registry.register::<User>().unwrap();

    assert_eq!(meta.table_name, "users");
    assert_eq!(meta.type_name, "User");
    let columns: Vec<_> = meta.columns().map(|f| f.column_name.as_str()).collect();
    assert_eq!(columns, vec!["id", "name", "email", "age", "status", "nickname"]);

    let pk = meta.primary_key().unwrap();
    assert_eq!(pk.name, "id");
    assert!(pk.is_auto_increment);
    assert_eq!(pk.kind, FieldKind::UInt64);
}

#[test]
fn test_field_options_parsed() {
    let meta = SchemaRegistry::new().register::<User>().unwrap();

    let name = meta.field_by_name("name").unwrap();
    assert!(!name.is_nullable);
    assert!(!name.is_unique);

    let email = meta.field_by_name("email").unwrap();
    assert!(email.is_unique);
    assert!(!email.is_nullable);

    let age = meta.field_by_name("age").unwrap();
    assert!(age.is_indexed);
    assert!(age.is_nullable);

    let status = meta.field_by_name("status").unwrap();
    assert_eq!(status.default_value.as_deref(), Some("'active'"));
}

#[test]
fn test_untagged_field_is_ignored() {
    let meta = SchemaRegistry::new().register::<User>().unwrap();
    assert!(meta.field_by_name("scratch").is_none());
}

#[test]
fn test_column_name_is_snake_cased() {
    let meta = SchemaRegistry::new().register::<Post>().unwrap();
    let fk = meta.field_by_name("UserID").unwrap();
    assert_eq!(fk.column_name, "user_id");
    assert_eq!(fk.column_type, None);

    let title = meta.field_by_column("title").unwrap();
    assert_eq!(title.column_type.as_deref(), Some("varchar(120)"));
}

#[test]
fn test_relations_are_metadata_not_columns() {
    let meta = SchemaRegistry::new().register::<User>().unwrap();

    assert_eq!(meta.relations.len(), 1);
    let rel = &meta.relations[0];
    assert_eq!(rel.kind, RelationKind::OneToMany);
    assert_eq!(rel.target.table_name, "posts");
    assert_eq!(rel.foreign_key.as_deref(), Some("UserID"));

    assert!(meta.field_by_column("posts").is_none());
    assert!(meta.insert_columns().all(|f| f.relation.is_none()));
}

#[test]
fn test_many_to_many_relation() {
    let meta = SchemaRegistry::new().register::<Role>().unwrap();
    let rel = &meta.relations[0];
    assert_eq!(rel.kind, RelationKind::ManyToMany);
    assert_eq!(rel.join_table.as_deref(), Some("user_roles"));
    assert_eq!(rel.reference_key.as_deref(), Some("RoleID"));
}

#[test]
fn test_register_is_idempotent() {
    let registry = SchemaRegistry::new();
    let first = registry.register::<User>().unwrap();
    let second = registry.register_entity(&User::default()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_lookup_by_type() {
    let registry = SchemaRegistry::new();
    assert!(registry.get::<User>().is_none());
    assert!(registry.is_empty());

    registry.register::<User>().unwrap();
    registry.register::<Post>().unwrap();

    assert_eq!(registry.get::<User>().unwrap().table_name, "users");
    let tables: Vec<_> = registry
        .entities()
        .iter()
        .map(|m| m.table_name.clone())
        .collect();
    assert_eq!(tables, vec!["posts", "users"]);
}

#[test]
fn test_require_unregistered_is_declared_error() {
    let err = SchemaRegistry::new().require::<Role>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotRegistered);
    assert!(err.to_string().contains("Role"));
}

#[test]
fn test_entity_without_primary_key_registers() {
    let meta = SchemaRegistry::new().register::<AuditLine>().unwrap();
    assert!(meta.primary_key().is_none());
    assert_eq!(
        meta.require_primary_key().unwrap_err().kind(),
        ErrorKind::NoPrimaryKey
    );
}

#[test]
fn test_registries_are_isolated() {
    let a = SchemaRegistry::new();
    let b = SchemaRegistry::new();
    a.register::<User>().unwrap();
    assert!(b.get::<User>().is_none());
}

// ---- rejected declarations ----

macro_rules! entity_with_fields {
    ($name:ident, $table:expr, [$($decl:expr),* $(,)?]) => {
        #[derive(Debug, Default)]
        struct $name;

        impl Hooks for $name {}

        impl Entity for $name {
            fn table_name() -> &'static str {
                $table
            }

            fn fields() -> Vec<FieldDecl> {
                vec![$($decl),*]
            }

            fn get(&self, _field: &str) -> Option<rowmap_core::Value> {
                None
            }

            fn set(&mut self, _field: &str, _value: rowmap_core::Value) -> bool {
                false
            }
        }
    };
}

entity_with_fields!(TwoKeys, "two_keys", [
    FieldDecl::of::<i64>("id").tag("primaryKey"),
    FieldDecl::of::<String>("code").tag("primaryKey"),
]);

entity_with_fields!(BadToken, "bad_token", [
    FieldDecl::of::<i64>("id").tag("primaryKey;nullable"),
]);

entity_with_fields!(MissingJoinTable, "missing_join", [
    FieldDecl::of::<i64>("id").tag("primaryKey"),
    FieldDecl::relation::<Role>("roles").tag("relation:ManyToMany;referenceKey:RoleID"),
]);

entity_with_fields!(MissingReferenceKey, "missing_ref", [
    FieldDecl::of::<i64>("id").tag("primaryKey"),
    FieldDecl::relation::<Role>("roles").tag("relation:ManyToMany;joinTable:user_roles"),
]);

entity_with_fields!(MissingForeignKey, "missing_fk", [
    FieldDecl::of::<i64>("id").tag("primaryKey"),
    FieldDecl::relation::<User>("owner").tag("relation:ManyToOne"),
]);

entity_with_fields!(SameColumn, "same_column", [
    FieldDecl::of::<i64>("id").tag("primaryKey"),
    FieldDecl::of::<String>("UserName").tag(""),
    FieldDecl::of::<String>("user_name").tag(""),
]);

entity_with_fields!(ScalarWithRelation, "scalar_rel", [
    FieldDecl::of::<i64>("owner").tag("relation:ManyToOne;foreignKey:OwnerID"),
]);

entity_with_fields!(SkippedKey, "skipped_key", [
    FieldDecl::of::<i64>("id").tag("primaryKey"),
    FieldDecl::of::<i64>("legacy_id").tag("-"),
]);

#[test]
fn test_duplicate_primary_key_rejected() {
    let err = SchemaRegistry::new().register::<TwoKeys>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicatePrimaryKey);
    assert!(err.to_string().contains("id"));
    assert!(err.to_string().contains("code"));
}

#[test]
fn test_unrecognized_token_rejected() {
    let err = SchemaRegistry::new().register::<BadToken>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTag);
    assert!(err.to_string().contains("nullable"));
}

#[test]
fn test_incomplete_many_to_many_rejected() {
    let registry = SchemaRegistry::new();
    let err = registry.register::<MissingJoinTable>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompleteRelation);
    assert!(err.to_string().contains("joinTable"));

    let err = registry.register::<MissingReferenceKey>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompleteRelation);
    assert!(err.to_string().contains("referenceKey"));

    assert!(registry.is_empty());
}

#[test]
fn test_relation_without_foreign_key_rejected() {
    let err = SchemaRegistry::new().register::<MissingForeignKey>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompleteRelation);
}

#[test]
fn test_duplicate_column_rejected() {
    let err = SchemaRegistry::new().register::<SameColumn>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateColumn);
    assert!(err.to_string().contains("user_name"));
}

#[test]
fn test_relation_option_on_scalar_rejected() {
    let err = SchemaRegistry::new()
        .register::<ScalarWithRelation>()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTag);
    assert!(err.kind().is_registration());
}

#[test]
fn test_skip_marker_excludes_field() {
    let meta = SchemaRegistry::new().register::<SkippedKey>().unwrap();
    assert_eq!(meta.fields.len(), 1);
    assert!(meta.field_by_name("legacy_id").is_none());
}

#[test]
fn test_rejection_is_logged() {
    let capture = rowmap_core::logging_facility::init_test_capture();
    let _ = SchemaRegistry::new().register::<TwoKeys>();

    let rejected = capture.count_events(|e| {
        e.op.as_deref() == Some(rowmap_core::schema::OP_REGISTER)
            && e.field(rowmap_core::schema::FIELD_ERR_CODE) == Some("ERR_DUPLICATE_PRIMARY_KEY")
    });
    assert!(rejected >= 1);
}

//! Shared entity fixtures for rowmap-core integration tests

#![allow(dead_code)]

use std::sync::Arc;

use rowmap_core::model::{Entity, EntityMetadata, FieldDecl, Hooks};
use rowmap_core::SchemaRegistry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub status: String,
    pub nickname: Option<String>,
    pub posts: Vec<Post>,
    pub scratch: String,
}

impl Hooks for User {}

impl Entity for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn fields() -> Vec<FieldDecl> {
        vec![
            FieldDecl::of::<u64>("id").tag("primaryKey;autoIncrement"),
            FieldDecl::of::<String>("name").tag("notnull"),
            FieldDecl::of::<String>("email").tag("unique;notnull"),
            FieldDecl::of::<i32>("age").tag("index"),
            FieldDecl::of::<String>("status").tag("default:'active'"),
            FieldDecl::of::<Option<String>>("nickname").tag(""),
            FieldDecl::relation::<Post>("posts").tag("relation:OneToMany;foreignKey:UserID"),
            FieldDecl::of::<String>("scratch"),
        ]
    }

    rowmap_core::field_accessors!(id, name, email, age, status, nickname);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Post {
    pub id: i64,
    pub user_id: u64,
    pub title: String,
}

impl Hooks for Post {}

impl Entity for Post {
    fn table_name() -> &'static str {
        "posts"
    }

    fn fields() -> Vec<FieldDecl> {
        vec![
            FieldDecl::of::<i64>("id").tag("primaryKey;autoIncrement"),
            FieldDecl::of::<u64>("UserID").tag("notnull;index"),
            FieldDecl::of::<String>("title").tag("type:varchar(120);notnull"),
            FieldDecl::relation::<User>("author").tag("relation:ManyToOne;foreignKey:UserID"),
        ]
    }

    fn get(&self, field: &str) -> Option<rowmap_core::Value> {
        use rowmap_core::FieldValue;
        match field {
            "id" => Some(self.id.to_value()),
            "UserID" => Some(self.user_id.to_value()),
            "title" => Some(self.title.to_value()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: rowmap_core::Value) -> bool {
        use rowmap_core::FieldValue;
        match field {
            "id" => i64::from_value(value).map(|v| self.id = v).is_some(),
            "UserID" => u64::from_value(value).map(|v| self.user_id = v).is_some(),
            "title" => String::from_value(value).map(|v| self.title = v).is_some(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Role {
    pub id: i32,
    pub label: String,
    pub users: Vec<User>,
}

impl Hooks for Role {}

impl Entity for Role {
    fn table_name() -> &'static str {
        "roles"
    }

    fn fields() -> Vec<FieldDecl> {
        vec![
            FieldDecl::of::<i32>("id").tag("primaryKey"),
            FieldDecl::of::<String>("label").tag("unique"),
            FieldDecl::relation::<User>("users")
                .tag("relation:ManyToMany;joinTable:user_roles;referenceKey:RoleID"),
        ]
    }

    rowmap_core::field_accessors!(id, label);
}

/// Entity without a primary key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLine {
    pub message: String,
}

impl Hooks for AuditLine {}

impl Entity for AuditLine {
    fn table_name() -> &'static str {
        "audit_lines"
    }

    fn fields() -> Vec<FieldDecl> {
        vec![FieldDecl::of::<String>("message").tag("notnull")]
    }

    rowmap_core::field_accessors!(message);
}

/// Register `E` in a fresh registry and return its metadata
pub fn metadata_of<E: Entity>() -> Arc<EntityMetadata> {
    SchemaRegistry::new()
        .register::<E>()
        .expect("fixture entity registers")
}

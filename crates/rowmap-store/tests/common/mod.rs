//! Shared fixtures for rowmap-store integration tests

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use rowmap_core::model::{Entity, FieldDecl, HookResult, Hooks};
use rowmap_core::{Dialect, SchemaRegistry, SqliteDialect};
use rowmap_store::db;
use rusqlite::Connection;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub status: String,
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
        ]
    }

    rowmap_core::field_accessors!(id, name, email, age, status);
}

impl User {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            status: "active".to_string(),
            ..Self::default()
        }
    }
}

/// Every column kind the store maps, with nullable and skipped fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub happened_at: DateTime<Utc>,
    pub confirmed: bool,
    pub score: f64,
    pub payload: Vec<u8>,
    pub attrs: serde_json::Value,
    pub note: Option<String>,
    pub external_id: Option<uuid::Uuid>,
    pub scratch: String,
}

impl Hooks for Event {}

impl Entity for Event {
    fn table_name() -> &'static str {
        "events"
    }

    fn fields() -> Vec<FieldDecl> {
        vec![
            FieldDecl::of::<i64>("id").tag("primaryKey;autoIncrement"),
            FieldDecl::of::<String>("title").tag("notnull"),
            FieldDecl::of::<DateTime<Utc>>("happened_at").tag("notnull"),
            FieldDecl::of::<bool>("confirmed").tag(""),
            FieldDecl::of::<f64>("score").tag(""),
            FieldDecl::of::<Vec<u8>>("payload").tag(""),
            FieldDecl::of::<serde_json::Value>("attrs").tag(""),
            FieldDecl::of::<Option<String>>("note").tag(""),
            FieldDecl::of::<Option<uuid::Uuid>>("external_id").tag(""),
            FieldDecl::of::<String>("scratch").tag("-"),
        ]
    }

    rowmap_core::field_accessors!(
        id,
        title,
        happened_at,
        confirmed,
        score,
        payload,
        attrs,
        note,
        external_id,
    );
}

/// Records hook calls; can be told to fail one of them
#[derive(Debug, Clone, Default)]
pub struct Note {
    pub id: i64,
    pub body: String,
    pub calls: Vec<&'static str>,
    pub fail_on: Option<&'static str>,
}

impl Note {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            ..Self::default()
        }
    }

    fn record(&mut self, hook: &'static str) -> HookResult {
        self.calls.push(hook);
        if self.fail_on == Some(hook) {
            return Err(format!("{} rejected", hook).into());
        }
        Ok(())
    }
}

impl Hooks for Note {
    fn before_save(&mut self) -> HookResult {
        self.record("before_save")
    }

    fn after_save(&mut self) -> HookResult {
        self.record("after_save")
    }

    fn before_create(&mut self) -> HookResult {
        self.record("before_create")
    }

    fn after_create(&mut self) -> HookResult {
        self.record("after_create")
    }

    fn before_update(&mut self) -> HookResult {
        self.record("before_update")
    }

    fn after_update(&mut self) -> HookResult {
        self.record("after_update")
    }

    fn before_delete(&mut self) -> HookResult {
        self.record("before_delete")
    }

    fn after_delete(&mut self) -> HookResult {
        self.record("after_delete")
    }
}

impl Entity for Note {
    fn table_name() -> &'static str {
        "notes"
    }

    fn fields() -> Vec<FieldDecl> {
        vec![
            FieldDecl::of::<i64>("id").tag("primaryKey;autoIncrement"),
            FieldDecl::of::<String>("body").tag("notnull"),
        ]
    }

    rowmap_core::field_accessors!(id, body);
}

/// Non-auto key assigned by a hook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
    pub id: uuid::Uuid,
    pub owner: String,
}

impl Hooks for Account {
    fn before_create(&mut self) -> HookResult {
        if self.id.is_nil() {
            self.id = uuid::Uuid::now_v7();
        }
        Ok(())
    }
}

impl Entity for Account {
    fn table_name() -> &'static str {
        "accounts"
    }

    fn fields() -> Vec<FieldDecl> {
        vec![
            FieldDecl::of::<uuid::Uuid>("id").tag("primaryKey"),
            FieldDecl::of::<String>("owner").tag("notnull"),
        ]
    }

    rowmap_core::field_accessors!(id, owner);
}

/// Auto-increment declared on a text key
#[derive(Debug, Clone, Default)]
pub struct Slug {
    pub code: String,
}

impl Hooks for Slug {}

impl Entity for Slug {
    fn table_name() -> &'static str {
        "slugs"
    }

    fn fields() -> Vec<FieldDecl> {
        vec![FieldDecl::of::<String>("code").tag("primaryKey;autoIncrement")]
    }

    rowmap_core::field_accessors!(code);
}

/// No primary key at all
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

/// Only a non-auto primary key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Marker {
    pub id: i64,
}

impl Hooks for Marker {}

impl Entity for Marker {
    fn table_name() -> &'static str {
        "markers"
    }

    fn fields() -> Vec<FieldDecl> {
        vec![FieldDecl::of::<i64>("id").tag("primaryKey")]
    }

    rowmap_core::field_accessors!(id);
}

/// Registry holding every fixture entity
pub fn registry() -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    registry.register::<User>().expect("register User");
    registry.register::<Event>().expect("register Event");
    registry.register::<Note>().expect("register Note");
    registry.register::<Account>().expect("register Account");
    registry.register::<Slug>().expect("register Slug");
    registry.register::<AuditLine>().expect("register AuditLine");
    registry.register::<Marker>().expect("register Marker");
    registry
}

/// In-memory connection with the fixture tables created
///
/// `slugs` is left out: SQLite refuses AUTOINCREMENT on a text key.
pub fn setup_test_db(registry: &SchemaRegistry) -> Connection {
    let conn = db::open_in_memory().expect("open in-memory db");
    let dialect = SqliteDialect::new();
    for meta in registry.entities() {
        if meta.table_name == Slug::table_name() {
            continue;
        }
        conn.execute_batch(&dialect.create_table_sql(&meta))
            .expect("create fixture table");
    }
    conn
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{metadata_of, AuditLine, User};
use rowmap_core::dialect::{Dialect, MysqlDialect, PostgresDialect, SqliteDialect};
use rowmap_core::errors::ErrorKind;
use rowmap_core::query::{build_delete_by_pk, build_insert, build_update, JoinKind};
use rowmap_core::{QueryBuilder, Value};

const USER_COLUMNS: &str = "\"id\", \"name\", \"email\", \"age\", \"status\", \"nickname\"";

fn users(dialect: impl Dialect + 'static) -> QueryBuilder {
    QueryBuilder::new(metadata_of::<User>(), Arc::new(dialect))
}

#[test]
fn test_plain_select_lists_metadata_columns() {
    let stmt = users(SqliteDialect::new()).build_select();
    assert_eq!(stmt.sql, format!("SELECT {} FROM \"users\"", USER_COLUMNS));
    assert!(stmt.args.is_empty());
}

#[test]
fn test_where_and_where_in_compose_with_and() {
    let q = users(SqliteDialect::new())
        .and_where("age > ?", [18])
        .where_in("status", ["active", "pending"]);

    let count = q.build_count();
    assert_eq!(
        count.sql,
        "SELECT COUNT(*) FROM \"users\" WHERE age > ? AND \"status\" IN (?, ?)"
    );
    assert_eq!(
        count.args,
        vec![
            Value::Int(18),
            Value::Text("active".into()),
            Value::Text("pending".into())
        ]
    );
}

#[test]
fn test_postgres_placeholders_follow_emission_order() {
    let stmt = users(PostgresDialect::new())
        .and_where("age > ?", [18])
        .where_in("status", ["active", "pending"])
        .where_between("id", 10u64, 20u64)
        .build_select();

    assert!(stmt.sql.ends_with(
        "WHERE age > $1 AND \"status\" IN ($2, $3) AND \"id\" BETWEEN $4 AND $5"
    ));
    assert_eq!(stmt.args.len(), 5);
    assert_eq!(stmt.args[3], Value::UInt(10));
}

#[test]
fn test_or_where_parenthesizes_prior_conditions() {
    let stmt = users(SqliteDialect::new())
        .and_where("age > ?", [18])
        .and_where("status = ?", ["active"])
        .or_where("name = ?", ["root"])
        .build_count();

    assert_eq!(
        stmt.sql,
        "SELECT COUNT(*) FROM \"users\" WHERE (age > ? AND status = ?) OR (name = ?)"
    );
    assert_eq!(
        stmt.args,
        vec![
            Value::Int(18),
            Value::Text("active".into()),
            Value::Text("root".into())
        ]
    );
}

#[test]
fn test_or_where_without_prior_is_plain_condition() {
    let stmt = users(SqliteDialect::new())
        .or_where("name = ?", ["root"])
        .build_count();
    assert_eq!(stmt.sql, "SELECT COUNT(*) FROM \"users\" WHERE name = ?");
}

#[test]
fn test_convenience_conditions() {
    let stmt = users(SqliteDialect::new())
        .where_like("email", "%@x.com")
        .where_null("nickname")
        .where_not_null("users.name")
        .where_not_in("status", ["banned"])
        .build_count();

    assert_eq!(
        stmt.sql,
        "SELECT COUNT(*) FROM \"users\" WHERE \"email\" LIKE ? AND \"nickname\" IS NULL \
         AND \"users\".\"name\" IS NOT NULL AND \"status\" NOT IN (?)"
    );
    assert_eq!(
        stmt.args,
        vec![Value::Text("%@x.com".into()), Value::Text("banned".into())]
    );
}

#[test]
fn test_empty_membership_lists() {
    let none: Vec<&str> = Vec::new();
    let stmt = users(SqliteDialect::new())
        .where_in("status", none.clone())
        .where_not_in("status", none)
        .build_count();
    assert_eq!(stmt.sql, "SELECT COUNT(*) FROM \"users\" WHERE 1 = 0 AND 1 = 1");
    assert!(stmt.args.is_empty());
}

#[test]
fn test_full_select_clause_order() {
    let stmt = users(PostgresDialect::new())
        .distinct()
        .left_join("posts", "posts.user_id = users.id")
        .and_where("users.age >= ?", [21])
        .group_by("users.id")
        .having("COUNT(posts.id) > ?", [2])
        .order_by("users.name ASC")
        .limit(10)
        .offset(20)
        .build_select();

    assert_eq!(
        stmt.sql,
        "SELECT DISTINCT \"users\".\"id\", \"users\".\"name\", \"users\".\"email\", \
         \"users\".\"age\", \"users\".\"status\", \"users\".\"nickname\" FROM \"users\" \
         LEFT JOIN \"posts\" ON posts.user_id = users.id \
         WHERE users.age >= $1 GROUP BY users.id HAVING COUNT(posts.id) > $2 \
         ORDER BY users.name ASC LIMIT 10 OFFSET 20"
    );
    assert_eq!(stmt.args, vec![Value::Int(21), Value::Int(2)]);
}

#[test]
fn test_join_kinds() {
    let stmt = users(MysqlDialect::new())
        .join(JoinKind::Inner, "posts", "posts.user_id = users.id")
        .right_join("roles", "roles.id = users.id")
        .full_join("audit", "audit.user_id = users.id")
        .build_select();

    assert!(stmt.sql.contains("INNER JOIN `posts` ON posts.user_id = users.id"));
    assert!(stmt.sql.contains("RIGHT JOIN `roles`"));
    assert!(stmt.sql.contains("FULL JOIN `audit`"));
    assert!(stmt.sql.starts_with("SELECT `users`.`id`, "));
}

#[test]
fn test_schema_qualified_join_quotes_each_segment() {
    let stmt = users(PostgresDialect::new())
        .left_join("main.posts", "posts.user_id = users.id")
        .build_select();
    assert!(stmt
        .sql
        .contains("LEFT JOIN \"main\".\"posts\" ON posts.user_id = users.id"));
}

#[test]
fn test_count_ignores_ordering_pagination_and_joins() {
    let stmt = users(SqliteDialect::new())
        .inner_join("posts", "posts.user_id = users.id")
        .and_where("age > ?", [30])
        .order_by("name")
        .limit(5)
        .offset(5)
        .build_count();
    assert_eq!(stmt.sql, "SELECT COUNT(*) FROM \"users\" WHERE age > ?");
}

#[test]
fn test_order_by_replaces_previous() {
    let stmt = users(SqliteDialect::new())
        .order_by("name")
        .order_by("age DESC")
        .build_select();
    assert!(stmt.sql.ends_with("ORDER BY age DESC"));
}

#[test]
fn test_builder_is_reusable_after_render() {
    let q = users(SqliteDialect::new()).and_where("age > ?", [1]);
    let first = q.build_select();
    let second = q.clone().limit(1).build_select();
    assert_eq!(first.args, second.args);
    assert!(second.sql.ends_with(" LIMIT 1"));
    assert!(!first.sql.contains("LIMIT"));
}

#[test]
fn test_insert_update_delete_for_user() {
    let meta = metadata_of::<User>();
    let dialect = PostgresDialect::new();
    let mut user = User {
        name: "Ann".into(),
        email: "ann@x.com".into(),
        age: 30,
        status: "active".into(),
        ..User::default()
    };

    let insert = build_insert(&meta, &dialect, &user);
    assert_eq!(
        insert.sql,
        "INSERT INTO \"users\" (\"name\", \"email\", \"age\", \"status\", \"nickname\") \
         VALUES ($1, $2, $3, $4, $5) RETURNING \"id\""
    );
    assert_eq!(insert.args[4], Value::Null);

    user.id = 7;
    let update = build_update(&meta, &dialect, &user).unwrap();
    assert_eq!(
        update.sql,
        "UPDATE \"users\" SET \"name\" = $1, \"email\" = $2, \"age\" = $3, \
         \"status\" = $4, \"nickname\" = $5 WHERE \"id\" = $6"
    );
    assert_eq!(update.args.last(), Some(&Value::UInt(7)));

    let delete = build_delete_by_pk(&meta, &dialect, Value::UInt(7)).unwrap();
    assert_eq!(delete.sql, "DELETE FROM \"users\" WHERE \"id\" = $1");
}

#[test]
fn test_sqlite_insert_has_no_returning() {
    let meta = metadata_of::<User>();
    let insert = build_insert(&meta, &SqliteDialect::new(), &User::default());
    assert!(!insert.sql.contains("RETURNING"));
}

#[test]
fn test_update_without_primary_key_is_declared_error() {
    let meta = metadata_of::<AuditLine>();
    let err = build_update(&meta, &SqliteDialect::new(), &AuditLine::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoPrimaryKey);

    let err = build_delete_by_pk(&meta, &SqliteDialect::new(), Value::Int(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoPrimaryKey);
}

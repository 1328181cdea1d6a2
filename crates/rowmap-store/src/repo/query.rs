//! Executable fluent query
//!
//! `Query` pairs a [`QueryBuilder`] with the repository that runs it. The
//! builder methods are mirrored here so chains read naturally from
//! `repo.find()`.

use rowmap_core::errors::OrmError;
use rowmap_core::model::{Entity, Value};
use rowmap_core::query::{JoinKind, QueryBuilder, Statement};
use rowmap_core_types::schema::{OP_QUERY_ALL, OP_QUERY_COUNT};

use crate::errors::Result;

use super::materialize::materialize_all;
use super::repository::Repository;

/// A query under construction for entity `E`
#[derive(Debug, Clone)]
pub struct Query<'c, E: Entity> {
    repo: Repository<'c, E>,
    builder: QueryBuilder,
}

impl<'c, E: Entity> Query<'c, E> {
    pub(crate) fn new(repo: Repository<'c, E>) -> Self {
        let builder = QueryBuilder::new(repo.metadata_arc(), repo.dialect_arc());
        Self { repo, builder }
    }

    fn map(mut self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        self.builder = f(self.builder);
        self
    }

    /// The underlying builder
    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    /// SELECT as it would execute now
    pub fn to_statement(&self) -> Statement {
        self.builder.build_select()
    }

    /// AND a raw condition; `?` marks each argument position
    pub fn and_where<I, V>(self, condition: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.map(|b| b.and_where(condition, args))
    }

    /// `(<all previous conditions>) OR (<condition>)`
    pub fn or_where<I, V>(self, condition: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.map(|b| b.or_where(condition, args))
    }

    pub fn where_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.map(|b| b.where_in(column, values))
    }

    pub fn where_not_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.map(|b| b.where_not_in(column, values))
    }

    pub fn where_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.map(|b| b.where_between(column, low, high))
    }

    pub fn where_like(self, column: &str, pattern: impl Into<Value>) -> Self {
        self.map(|b| b.where_like(column, pattern))
    }

    pub fn where_null(self, column: &str) -> Self {
        self.map(|b| b.where_null(column))
    }

    pub fn where_not_null(self, column: &str) -> Self {
        self.map(|b| b.where_not_null(column))
    }

    pub fn join(self, kind: JoinKind, table: &str, on: &str) -> Self {
        self.map(|b| b.join(kind, table, on))
    }

    pub fn inner_join(self, table: &str, on: &str) -> Self {
        self.join(JoinKind::Inner, table, on)
    }

    pub fn left_join(self, table: &str, on: &str) -> Self {
        self.join(JoinKind::Left, table, on)
    }

    pub fn right_join(self, table: &str, on: &str) -> Self {
        self.join(JoinKind::Right, table, on)
    }

    pub fn full_join(self, table: &str, on: &str) -> Self {
        self.join(JoinKind::Full, table, on)
    }

    pub fn group_by(self, expr: &str) -> Self {
        self.map(|b| b.group_by(expr))
    }

    pub fn having<I, V>(self, condition: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.map(|b| b.having(condition, args))
    }

    pub fn distinct(self) -> Self {
        self.map(QueryBuilder::distinct)
    }

    pub fn order_by(self, expr: &str) -> Self {
        self.map(|b| b.order_by(expr))
    }

    pub fn limit(self, limit: u64) -> Self {
        self.map(|b| b.limit(limit))
    }

    pub fn offset(self, offset: u64) -> Self {
        self.map(|b| b.offset(offset))
    }

    /// Execute the SELECT and materialize every row
    ///
    /// # Errors
    /// * `Driver` - the query failed
    pub fn all(self) -> Result<Vec<E>> {
        let Self { repo, builder } = self;
        repo.instrumented(OP_QUERY_ALL, || {
            let scanned = repo.query_rows(&builder.build_select())?;
            tracing::debug!(
                table = %repo.metadata().table_name,
                row_count = scanned.rows.len(),
                "rows scanned"
            );
            Ok(materialize_all(repo.metadata(), scanned))
        })
    }

    /// Execute with `LIMIT 1` and return the single row
    ///
    /// # Errors
    /// * `NotFound` - the query matched no rows
    /// * `Driver` - the query failed
    pub fn one(self) -> Result<E> {
        let table = self.repo.metadata().table_name.clone();
        self.limit(1)
            .all()?
            .into_iter()
            .next()
            .ok_or(OrmError::NotFound { table })
    }

    /// Execute `SELECT COUNT(*)` over the same conditions
    ///
    /// # Errors
    /// * `Driver` - the query failed
    pub fn count(self) -> Result<i64> {
        let Self { repo, builder } = self;
        repo.instrumented(OP_QUERY_COUNT, || repo.query_i64(&builder.build_count()))
    }
}

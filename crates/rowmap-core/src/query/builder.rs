//! Fluent SELECT/COUNT builder
//!
//! Conditions are kept as fragments with `?` markers plus their arguments,
//! and only bound to dialect placeholders at render time so numbering always
//! follows emission order.

use std::sync::Arc;

use crate::dialect::Dialect;
use crate::model::{EntityMetadata, Value};

use super::{bind_placeholders, Statement};

/// Join flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Condition {
    sql: String,
    args: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
struct Join {
    kind: JoinKind,
    table: String,
    on: String,
}

/// Accumulated query state for one entity
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    meta: Arc<EntityMetadata>,
    dialect: Arc<dyn Dialect>,
    conditions: Vec<Condition>,
    joins: Vec<Join>,
    group_by: Vec<String>,
    having: Vec<Condition>,
    distinct: bool,
    order_by: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl QueryBuilder {
    pub fn new(meta: Arc<EntityMetadata>, dialect: Arc<dyn Dialect>) -> Self {
        Self {
            meta,
            dialect,
            conditions: Vec::new(),
            joins: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            distinct: false,
            order_by: None,
            limit: None,
            offset: None,
        }
    }

    pub fn metadata(&self) -> &EntityMetadata {
        &self.meta
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// AND a raw condition; `?` marks each argument position
    pub fn and_where<I, V>(mut self, condition: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.conditions.push(Condition {
            sql: condition.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// `(<all previous conditions>) OR (<condition>)`
    pub fn or_where<I, V>(mut self, condition: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let branch = Condition {
            sql: condition.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        };

        if self.conditions.is_empty() {
            self.conditions.push(branch);
            return self;
        }

        let prior = std::mem::take(&mut self.conditions);
        let sql = format!(
            "({}) OR ({})",
            prior
                .iter()
                .map(|c| c.sql.as_str())
                .collect::<Vec<_>>()
                .join(" AND "),
            branch.sql
        );
        let mut args: Vec<Value> = prior.into_iter().flat_map(|c| c.args).collect();
        args.extend(branch.args);
        self.conditions.push(Condition { sql, args });
        self
    }

    pub fn where_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.membership(column, "IN", values, "1 = 0")
    }

    pub fn where_not_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.membership(column, "NOT IN", values, "1 = 1")
    }

    pub fn where_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        let sql = format!("{} BETWEEN ? AND ?", self.dialect.quote_column(column));
        self.and_where(&sql, [low.into(), high.into()])
    }

    pub fn where_like(self, column: &str, pattern: impl Into<Value>) -> Self {
        let sql = format!("{} LIKE ?", self.dialect.quote_column(column));
        self.and_where(&sql, [pattern.into()])
    }

    pub fn where_null(self, column: &str) -> Self {
        let sql = format!("{} IS NULL", self.dialect.quote_column(column));
        self.and_where(&sql, Vec::<Value>::new())
    }

    pub fn where_not_null(self, column: &str) -> Self {
        let sql = format!("{} IS NOT NULL", self.dialect.quote_column(column));
        self.and_where(&sql, Vec::<Value>::new())
    }

    /// Add a join; `on` is raw SQL
    ///
    /// `table` is a table name, optionally schema-qualified (`main.posts`);
    /// each segment is quoted, so aliases are not supported.
    pub fn join(mut self, kind: JoinKind, table: &str, on: &str) -> Self {
        self.joins.push(Join {
            kind,
            table: table.to_string(),
            on: on.to_string(),
        });
        self
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

    /// GROUP BY expression (raw)
    pub fn group_by(mut self, expr: &str) -> Self {
        self.group_by.push(expr.to_string());
        self
    }

    /// HAVING condition; `?` marks each argument position
    pub fn having<I, V>(mut self, condition: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.having.push(Condition {
            sql: condition.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// ORDER BY expression (raw); replaces any earlier ordering
    pub fn order_by(mut self, expr: &str) -> Self {
        self.order_by = Some(expr.to_string());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Render the SELECT
    ///
    /// `SELECT [DISTINCT] <columns> FROM <table> [joins] [WHERE] [GROUP BY]
    /// [HAVING] [ORDER BY] [LIMIT] [OFFSET]`. The column list always comes
    /// from metadata; it is table-qualified when joins are present.
    pub fn build_select(&self) -> Statement {
        let d = self.dialect.as_ref();
        let table = d.quote_identifier(&self.meta.table_name);
        let qualify = !self.joins.is_empty();

        let columns = self
            .meta
            .columns()
            .map(|f| {
                let col = d.quote_identifier(&f.column_name);
                if qualify {
                    format!("{}.{}", table, col)
                } else {
                    col
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&columns);
        sql.push_str(" FROM ");
        sql.push_str(&table);

        for join in &self.joins {
            sql.push_str(&format!(
                " {} {} ON {}",
                join.kind.keyword(),
                d.quote_column(&join.table),
                join.on
            ));
        }

        let mut args = Vec::new();
        let mut next = 1;
        self.push_conditions(&mut sql, " WHERE ", &self.conditions, &mut args, &mut next);

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }
        self.push_conditions(&mut sql, " HAVING ", &self.having, &mut args, &mut next);

        if let Some(order) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        sql.push_str(&d.limit_offset(self.limit, self.offset));

        Statement { sql, args }
    }

    /// Render `SELECT COUNT(*)` over the same conditions
    ///
    /// Joins, grouping, ordering and pagination are ignored.
    pub fn build_count(&self) -> Statement {
        let mut sql = format!(
            "SELECT COUNT(*) FROM {}",
            self.dialect.quote_identifier(&self.meta.table_name)
        );
        let mut args = Vec::new();
        let mut next = 1;
        self.push_conditions(&mut sql, " WHERE ", &self.conditions, &mut args, &mut next);
        Statement { sql, args }
    }

    fn membership<I, V>(self, column: &str, op: &str, values: I, when_empty: &str) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return self.and_where(when_empty, Vec::<Value>::new());
        }
        let markers = vec!["?"; values.len()].join(", ");
        let sql = format!("{} {} ({})", self.dialect.quote_column(column), op, markers);
        self.and_where(&sql, values)
    }

    fn push_conditions(
        &self,
        sql: &mut String,
        keyword: &str,
        conditions: &[Condition],
        args: &mut Vec<Value>,
        next: &mut usize,
    ) {
        if conditions.is_empty() {
            return;
        }
        let rendered = conditions
            .iter()
            .map(|c| bind_placeholders(&c.sql, self.dialect.as_ref(), next))
            .collect::<Vec<_>>()
            .join(" AND ");
        sql.push_str(keyword);
        sql.push_str(&rendered);
        args.extend(conditions.iter().flat_map(|c| c.args.iter().cloned()));
    }
}

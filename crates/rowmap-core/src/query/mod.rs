//! Statement rendering
//!
//! Everything here is pure: metadata, dialect and caller predicates go in,
//! one SQL string plus one ordered argument list comes out. Execution lives
//! in the store crate.

pub mod builder;
pub mod statements;

use crate::dialect::Dialect;
use crate::model::Value;

pub use builder::{JoinKind, QueryBuilder};
pub use statements::{build_delete_by_pk, build_insert, build_update};

/// Rendered SQL text with its positional arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Rewrite `?` markers in a caller fragment to the dialect's placeholders
///
/// `next` is the 1-based position of the next placeholder and is advanced
/// for every marker. Markers inside single-quoted literals are left alone.
pub fn bind_placeholders(fragment: &str, dialect: &dyn Dialect, next: &mut usize) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_literal = false;

    for ch in fragment.chars() {
        match ch {
            '\'' => {
                in_literal = !in_literal;
                out.push(ch);
            }
            '?' if !in_literal => {
                out.push_str(&dialect.placeholder(*next));
                *next += 1;
            }
            _ => out.push(ch),
        }
    }

    out
}

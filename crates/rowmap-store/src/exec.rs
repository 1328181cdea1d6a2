//! Statement execution over rusqlite
//!
//! Arguments are bound from `Value`s and every scanned column comes back as a
//! `Value`; typed conversion to entity fields happens one layer up.

use chrono::SecondsFormat;
use rowmap_core::query::Statement;
use rowmap_core::Value;
use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};

use crate::errors::{from_rusqlite, Result};

/// Binds one `Value` as a SQLite parameter
///
/// Timestamps are stored as RFC 3339 text in UTC; unsigned values above
/// `i64::MAX` fail to bind.
#[derive(Debug)]
pub struct SqlArg<'a>(pub &'a Value);

impl ToSql for SqlArg<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let out = match self.0 {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Int(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            Value::UInt(v) => {
                let v = i64::try_from(*v)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                ToSqlOutput::Owned(SqlValue::Integer(v))
            }
            Value::Float(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            Value::Bool(v) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v))),
            Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            Value::Blob(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v.as_slice())),
            Value::Timestamp(v) => {
                ToSqlOutput::Owned(SqlValue::Text(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
            }
        };
        Ok(out)
    }
}

/// Result set of one SELECT, column names in select-list order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScannedRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Convert a borrowed SQLite value into an owned `Value`
pub fn scan_value(raw: ValueRef<'_>) -> Value {
    match raw {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int(v),
        ValueRef::Real(v) => Value::Float(v),
        // invalid UTF-8 stays raw so a text field refuses it instead of
        // receiving replacement characters
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Blob(bytes.to_vec()),
        },
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

/// Execute a statement that returns no rows; yields the affected row count
pub fn execute(conn: &Connection, stmt: &Statement) -> Result<usize> {
    trace_statement(stmt);
    let mut prepared = conn
        .prepare_cached(&stmt.sql)
        .map_err(|e| from_rusqlite("prepare", e))?;
    prepared
        .execute(params_from_iter(stmt.args.iter().map(SqlArg)))
        .map_err(|e| from_rusqlite("execute", e))
}

/// Execute a raw DDL/batch statement without arguments
pub fn execute_batch(conn: &Connection, sql: &str) -> Result<()> {
    tracing::debug!(sql = %sql, "executing batch");
    conn.execute_batch(sql)
        .map_err(|e| from_rusqlite("execute_batch", e))
}

/// Run a SELECT and scan every row
pub fn query_rows(conn: &Connection, stmt: &Statement) -> Result<ScannedRows> {
    trace_statement(stmt);
    let mut prepared = conn
        .prepare_cached(&stmt.sql)
        .map_err(|e| from_rusqlite("prepare", e))?;
    let columns: Vec<String> = prepared
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = prepared
        .query(params_from_iter(stmt.args.iter().map(SqlArg)))
        .map_err(|e| from_rusqlite("query", e))?;

    let mut scanned = Vec::new();
    while let Some(row) = rows.next().map_err(|e| from_rusqlite("query", e))? {
        let mut values = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            let raw = row.get_ref(idx).map_err(|e| from_rusqlite("scan", e))?;
            values.push(scan_value(raw));
        }
        scanned.push(values);
    }

    Ok(ScannedRows {
        columns,
        rows: scanned,
    })
}

/// Run a single-row, single-column integer query (COUNT)
pub fn query_i64(conn: &Connection, stmt: &Statement) -> Result<i64> {
    trace_statement(stmt);
    let mut prepared = conn
        .prepare_cached(&stmt.sql)
        .map_err(|e| from_rusqlite("prepare", e))?;
    prepared
        .query_row(params_from_iter(stmt.args.iter().map(SqlArg)), |row| {
            row.get(0)
        })
        .map_err(|e| from_rusqlite("query", e))
}

fn trace_statement(stmt: &Statement) {
    tracing::debug!(
        sql = %stmt.sql,
        arg_count = stmt.args.len(),
        "executing statement"
    );
}

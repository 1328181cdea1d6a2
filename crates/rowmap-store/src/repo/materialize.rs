//! Row-to-entity materialization
//!
//! Each scanned column is matched to a field by column name and handed to
//! `Entity::set`. A value the field cannot hold (a NULL into a non-Option
//! field, text into an integer) is skipped: the field keeps its default and
//! the skip is logged at debug level.

use rowmap_core::model::{Entity, EntityMetadata};
use rowmap_core::Value;

use crate::exec::ScannedRows;

/// Build one entity from a scanned row
pub fn materialize_row<E: Entity>(meta: &EntityMetadata, columns: &[String], row: Vec<Value>) -> E {
    let mut entity = E::default();

    for (column, value) in columns.iter().zip(row) {
        let Some(field) = meta.field_by_column(column) else {
            continue;
        };
        let shown = if tracing::enabled!(tracing::Level::DEBUG) {
            Some(value.to_string())
        } else {
            None
        };
        if !entity.set(&field.name, value) {
            tracing::debug!(
                table = %meta.table_name,
                column = %column,
                field = %field.name,
                kind = ?field.kind,
                value = shown.as_deref().unwrap_or_default(),
                "materialization skipped unconvertible value"
            );
        }
    }

    entity
}

/// Build every entity of a result set, in row order
pub fn materialize_all<E: Entity>(meta: &EntityMetadata, scanned: ScannedRows) -> Vec<E> {
    let ScannedRows { columns, rows } = scanned;
    rows.into_iter()
        .map(|row| materialize_row(meta, &columns, row))
        .collect()
}

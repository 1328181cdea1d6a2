//! INSERT / UPDATE / DELETE rendering
//!
//! Column lists come from metadata only: relation fields never appear, an
//! auto-increment key is left out of INSERT, and UPDATE never writes the key.

use crate::dialect::Dialect;
use crate::errors::Result;
use crate::model::{Entity, EntityMetadata, FieldMetadata, Value};

use super::Statement;

/// Current value of a field, `Null` when the entity's accessor doesn't know it
pub fn field_value<E: Entity>(entity: &E, field: &FieldMetadata) -> Value {
    entity.get(&field.name).unwrap_or(Value::Null)
}

/// INSERT over every insertable column
///
/// When the key is auto-increment and the dialect reads generated keys back
/// with `RETURNING`, the clause is appended.
pub fn build_insert<E: Entity>(
    meta: &EntityMetadata,
    dialect: &dyn Dialect,
    entity: &E,
) -> Statement {
    let fields: Vec<&FieldMetadata> = meta.insert_columns().collect();

    let columns = fields
        .iter()
        .map(|f| dialect.quote_identifier(&f.column_name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=fields.len())
        .map(|i| dialect.placeholder(i))
        .collect::<Vec<_>>()
        .join(", ");
    let args = fields.iter().map(|f| field_value(entity, f)).collect();

    let table = dialect.quote_identifier(&meta.table_name);
    let mut sql = if fields.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES", table)
    } else {
        format!("INSERT INTO {} ({}) VALUES ({})", table, columns, placeholders)
    };

    if let Some(pk) = meta.primary_key().filter(|pk| pk.is_auto_increment) {
        if let Some(returning) = dialect.returning_clause(pk) {
            sql.push_str(&returning);
        }
    }

    Statement { sql, args }
}

/// UPDATE of every non-key column, keyed on the current primary key value
///
/// An entity whose only column is its key sets the key to its own value, so
/// the statement stays valid and changes nothing.
///
/// # Errors
/// * `NoPrimaryKey` - the entity declares no primary key
pub fn build_update<E: Entity>(
    meta: &EntityMetadata,
    dialect: &dyn Dialect,
    entity: &E,
) -> Result<Statement> {
    let pk = meta.require_primary_key()?;
    let mut fields: Vec<&FieldMetadata> = meta.update_columns().collect();
    // key-only entity: rewrite the key onto itself so the row is still matched
    if fields.is_empty() {
        fields.push(pk);
    }

    let assignments = fields
        .iter()
        .enumerate()
        .map(|(i, f)| {
            format!(
                "{} = {}",
                dialect.quote_identifier(&f.column_name),
                dialect.placeholder(i + 1)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut args: Vec<Value> = fields.iter().map(|f| field_value(entity, f)).collect();
    args.push(field_value(entity, pk));

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        dialect.quote_identifier(&meta.table_name),
        assignments,
        dialect.quote_identifier(&pk.column_name),
        dialect.placeholder(fields.len() + 1)
    );

    Ok(Statement { sql, args })
}

/// DELETE of the row whose primary key equals `id`
///
/// # Errors
/// * `NoPrimaryKey` - the entity declares no primary key
pub fn build_delete_by_pk(
    meta: &EntityMetadata,
    dialect: &dyn Dialect,
    id: Value,
) -> Result<Statement> {
    let pk = meta.require_primary_key()?;
    let sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        dialect.quote_identifier(&meta.table_name),
        dialect.quote_identifier(&pk.column_name),
        dialect.placeholder(1)
    );
    Ok(Statement::new(sql, vec![id]))
}

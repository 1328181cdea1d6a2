//! Entity annotation parser
//!
//! ```text
//! tag    := option (";" option)*
//! option := "primaryKey" | "autoIncrement" | "unique" | "index" | "notnull"
//!         | "type:" sql-type | "default:" literal
//!         | "relation:" ("OneToOne" | "OneToMany" | "ManyToOne" | "ManyToMany")
//!         | "foreignKey:" field | "joinTable:" table | "referenceKey:" field
//! ```
//!
//! Surrounding whitespace is trimmed and empty segments (a trailing `;`) are
//! skipped. Unknown options, repeated options, a boolean option given a value
//! and a value option given none are all rejected.

use crate::model::RelationKind;

/// The skip marker: the field is not persisted
pub const SKIP_MARKER: &str = "-";

/// Parsed form of one annotation string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTag {
    pub primary_key: bool,
    pub auto_increment: bool,
    pub unique: bool,
    pub index: bool,
    pub not_null: bool,
    pub column_type: Option<String>,
    pub default_value: Option<String>,
    pub relation: Option<RelationKind>,
    pub foreign_key: Option<String>,
    pub join_table: Option<String>,
    pub reference_key: Option<String>,
}

/// Whether the annotation marks the field as not persisted
pub fn is_skip(tag: &str) -> bool {
    tag.trim() == SKIP_MARKER
}

/// Parse an annotation string; the error is a human-readable reason
pub fn parse_tag(tag: &str) -> Result<ParsedTag, String> {
    let mut parsed = ParsedTag::default();

    for raw in tag.split(';') {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }

        match token.split_once(':') {
            None => set_flag(&mut parsed, token)?,
            Some((key, value)) => set_value(&mut parsed, key.trim(), value.trim())?,
        }
    }

    Ok(parsed)
}

fn set_flag(parsed: &mut ParsedTag, token: &str) -> Result<(), String> {
    let slot = match token {
        "primaryKey" => &mut parsed.primary_key,
        "autoIncrement" => &mut parsed.auto_increment,
        "unique" => &mut parsed.unique,
        "index" => &mut parsed.index,
        "notnull" => &mut parsed.not_null,
        "type" | "default" | "relation" | "foreignKey" | "joinTable" | "referenceKey" => {
            return Err(format!("option '{}' requires a value", token));
        }
        _ => return Err(format!("unrecognized option '{}'", token)),
    };

    if *slot {
        return Err(format!("option '{}' given more than once", token));
    }
    *slot = true;
    Ok(())
}

fn set_value(parsed: &mut ParsedTag, key: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("option '{}' has an empty value", key));
    }

    if key == "relation" {
        if parsed.relation.is_some() {
            return Err("option 'relation' given more than once".to_string());
        }
        let kind = RelationKind::parse(value)
            .ok_or_else(|| format!("unknown relation kind '{}'", value))?;
        parsed.relation = Some(kind);
        return Ok(());
    }

    let slot = match key {
        "type" => &mut parsed.column_type,
        "default" => &mut parsed.default_value,
        "foreignKey" => &mut parsed.foreign_key,
        "joinTable" => &mut parsed.join_table,
        "referenceKey" => &mut parsed.reference_key,
        "primaryKey" | "autoIncrement" | "unique" | "index" | "notnull" => {
            return Err(format!("option '{}' does not take a value", key));
        }
        _ => return Err(format!("unrecognized option '{}'", key)),
    };

    if slot.is_some() {
        return Err(format!("option '{}' given more than once", key));
    }
    *slot = Some(value.to_string());
    Ok(())
}

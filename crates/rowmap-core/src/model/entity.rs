//! Entity and lifecycle hook contracts
//!
//! An entity declares its storage shape once through [`Entity::fields`]; the
//! schema registry turns that declaration into [`EntityMetadata`]. At query
//! time the repository only touches the entity through [`Entity::get`] and
//! [`Entity::set`], addressed by field name.
//!
//! [`EntityMetadata`]: super::EntityMetadata

use crate::errors::BoxError;

use super::field::FieldDecl;
use super::value::Value;

/// Result returned by lifecycle hooks
pub type HookResult = std::result::Result<(), BoxError>;

/// Optional lifecycle callbacks
///
/// Every method defaults to a no-op. For a save the repository calls
/// `before_save`, then `before_create` or `before_update`, runs the
/// statement, then `after_create` or `after_update`, then `after_save`.
/// A delete runs `before_delete`, the statement, then `after_delete`.
/// An error from a before-hook stops the operation before any SQL runs.
pub trait Hooks {
    fn before_save(&mut self) -> HookResult {
        Ok(())
    }

    fn after_save(&mut self) -> HookResult {
        Ok(())
    }

    fn before_create(&mut self) -> HookResult {
        Ok(())
    }

    fn after_create(&mut self) -> HookResult {
        Ok(())
    }

    fn before_update(&mut self) -> HookResult {
        Ok(())
    }

    fn after_update(&mut self) -> HookResult {
        Ok(())
    }

    fn before_delete(&mut self) -> HookResult {
        Ok(())
    }

    fn after_delete(&mut self) -> HookResult {
        Ok(())
    }
}

/// A structured type persisted as rows of one table
///
/// # Example
///
/// ```
/// use rowmap_core::model::{Entity, FieldDecl, Hooks};
///
/// #[derive(Debug, Default)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// impl Hooks for User {}
///
/// impl Entity for User {
///     fn table_name() -> &'static str {
///         "users"
///     }
///
///     fn fields() -> Vec<FieldDecl> {
///         vec![
///             FieldDecl::of::<u64>("id").tag("primaryKey;autoIncrement"),
///             FieldDecl::of::<String>("name").tag("notnull"),
///         ]
///     }
///
///     rowmap_core::field_accessors!(id, name);
/// }
/// ```
pub trait Entity: Hooks + Default + 'static {
    /// Table the entity is stored in
    fn table_name() -> &'static str;

    /// Declared fields, in declaration order
    fn fields() -> Vec<FieldDecl>;

    /// Current value of a scalar field by name
    fn get(&self, field: &str) -> Option<Value>;

    /// Assign a scalar field by name; `false` if the field is unknown or the
    /// value is not convertible to its declared type
    fn set(&mut self, field: &str, value: Value) -> bool;
}

/// Generate [`Entity::get`] and [`Entity::set`] for named struct fields
///
/// Each listed field must implement [`FieldValue`](super::FieldValue). The
/// field's Rust identifier is the name used in [`FieldDecl`].
#[macro_export]
macro_rules! field_accessors {
    ($($field:ident),+ $(,)?) => {
        fn get(&self, field: &str) -> ::core::option::Option<$crate::model::Value> {
            match field {
                $(
                    stringify!($field) => ::core::option::Option::Some(
                        $crate::model::FieldValue::to_value(&self.$field),
                    ),
                )+
                _ => ::core::option::Option::None,
            }
        }

        fn set(&mut self, field: &str, value: $crate::model::Value) -> bool {
            match field {
                $(
                    stringify!($field) => match $crate::model::FieldValue::from_value(value) {
                        ::core::option::Option::Some(v) => {
                            self.$field = v;
                            true
                        }
                        ::core::option::Option::None => false,
                    },
                )+
                _ => false,
            }
        }
    };
}

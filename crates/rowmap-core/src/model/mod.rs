pub mod entity;
pub mod field;
pub mod metadata;
pub mod relation;
pub mod value;

pub use entity::{Entity, HookResult, Hooks};
pub use field::{FieldDecl, FieldKind, FieldMetadata};
pub use metadata::EntityMetadata;
pub use relation::{RelationKind, RelationMetadata, RelationTarget};
pub use value::{FieldValue, Value};

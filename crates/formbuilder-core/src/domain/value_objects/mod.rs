//! Value Objects
//!
//! Immutable domain primitives of the form builder.

pub mod field_type;
pub mod field_value;
pub mod identity;

pub use field_type::FieldType;
pub use field_value::{is_truthy, DateConfig, FieldValue};
pub use identity::{FormId, Identity, Role};

//! Aggregates

pub mod component;
pub mod document;
pub mod field;
pub mod form_record;
pub mod tree;

pub use component::{ComponentDraft, CustomComponent, GuidedComponent, RegistryError};
pub use document::{FormDocument, DEFAULT_FORM_WIDTH, DEFAULT_LAYOUT, STANDARD_LAYOUTS};
pub use field::{ColumnDefinition, FieldNode, FieldUpdate, ItemInfo, LoadDataInfo};
pub use form_record::{FormRecord, FormStatus, Priority};

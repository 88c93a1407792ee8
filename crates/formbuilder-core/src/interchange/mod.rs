//! Interchange (Anti-Corruption Layer)
//!
//! Translates between the domain model and the external form JSON:
//! - Import accepts canonical camelCase and legacy PascalCase keys
//! - Export always writes canonical camelCase
//! - Unknown attributes survive both directions

pub mod aliases;
pub mod export;
pub mod import;

pub use export::{export_document, suggested_filename};
pub use import::{FormMetadata, ImportError, ImportedDefinition, Importer};

//! Form Builder Engine
//!
//! Document model and editing engine for data-entry form definitions,
//! organized along Domain-Driven Design lines.
//!
//! ## Architecture
//!
//! - **Domain Layer**: Field tree, form document, form record aggregate, validator
//! - **Interchange**: Lenient import of external form JSON, canonical export
//! - **Application Layer**: Form use cases, interactive editor, auto-save
//! - **Ports Layer**: Hexagonal architecture interfaces
//! - **Infrastructure Layer**: In-memory storage and notification inboxes
//!
//! ## Key Aggregates
//!
//! - **FormDocument**: Metadata, nested field tree and custom component registry
//! - **FormRecord**: A persisted form with ownership, assignment and workflow status

pub mod domain;
pub mod interchange;
pub mod application;
pub mod ports;
pub mod infrastructure;

// Re-exports for convenience
pub use domain::aggregates::{
    ComponentDraft, CustomComponent, FieldNode, FieldUpdate, FormDocument, FormRecord, FormStatus, Priority,
};
pub use domain::value_objects::{FieldType, FieldValue, FormId, Identity, Role};
pub use domain::events::{DomainEvent, FormEvent};
pub use domain::services::{Clock, SystemClock, ValidationReport, Validator};
pub use interchange::{export_document, ImportError, ImportedDefinition, Importer};
pub use application::{AutoSaveConfig, AutoSaver, FormEditor, FormService};
pub use ports::inbound::{FormUseCases, UseCaseError};
pub use ports::outbound::{EventPublisher, FormRepository, RepositoryError};
pub use infrastructure::{InMemoryFormRepository, NotificationCenter};

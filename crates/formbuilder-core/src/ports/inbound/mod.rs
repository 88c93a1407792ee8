//! Inbound ports (Use case traits)
//!
//! Hexagonal architecture: application service interfaces.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::application::dto::*;
use crate::domain::aggregates::{FormDocument, FormRecord};
use crate::domain::services::ValidationReport;
use crate::domain::value_objects::{FormId, Identity};
use crate::interchange::ImportError;
use crate::ports::outbound::RepositoryError;

/// Form management use cases
#[async_trait]
pub trait FormUseCases: Send + Sync {
    /// Create a new form owned by the caller
    async fn create_form(&self, actor: &Identity, command: CreateFormCommand) -> Result<FormRecord, UseCaseError>;

    /// Get form by ID
    async fn get_form(&self, actor: &Identity, id: FormId) -> Result<FormRecord, UseCaseError>;

    /// Get form by menu id
    async fn get_form_by_menu_id(&self, actor: &Identity, menu_id: &str) -> Result<FormRecord, UseCaseError>;

    /// Forms visible to the caller, most recently updated first
    async fn list_forms(&self, actor: &Identity) -> Result<Vec<FormRecord>, UseCaseError>;

    /// Replace the stored document
    async fn save_document(&self, actor: &Identity, id: FormId, document: FormDocument) -> Result<FormRecord, UseCaseError>;

    /// Delete form (admin or creator)
    async fn delete_form(&self, actor: &Identity, id: FormId) -> Result<(), UseCaseError>;

    /// Assign form to a user (admin only)
    async fn assign_form(&self, actor: &Identity, id: FormId, command: AssignFormCommand) -> Result<FormRecord, UseCaseError>;

    /// Change task status and/or priority
    async fn update_status(&self, actor: &Identity, id: FormId, command: UpdateStatusCommand) -> Result<FormRecord, UseCaseError>;

    /// Create a form from an interchange file
    async fn import_form(&self, actor: &Identity, text: &str) -> Result<FormRecord, UseCaseError>;

    /// Validate a stored form
    async fn validate_form(&self, actor: &Identity, id: FormId) -> Result<ValidationReport, UseCaseError>;

    /// Validate a raw form definition
    fn validate_definition(&self, definition: &Value) -> ValidationReport;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UseCaseError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Validation failed: {}", .0.errors.join("; "))]
    Validation(ValidationReport),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl UseCaseError {
    /// Single-message validation failure
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(ValidationReport {
            errors: vec![message.into()],
            warnings: vec![],
        })
    }
}

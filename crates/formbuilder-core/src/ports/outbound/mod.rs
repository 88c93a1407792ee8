//! Outbound ports (Repository traits)
//!
//! Hexagonal architecture: these are the interfaces that infrastructure must implement.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::aggregates::FormRecord;
use crate::domain::value_objects::{FormId, Identity};
use crate::domain::DomainEvent;

/// Form repository port
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Reserve the next numeric form id
    async fn next_id(&self) -> Result<FormId, RepositoryError>;

    /// Find form by ID
    async fn find_by_id(&self, id: FormId) -> Result<Option<FormRecord>, RepositoryError>;

    /// Find form by its unique menu id
    async fn find_by_menu_id(&self, menu_id: &str) -> Result<Option<FormRecord>, RepositoryError>;

    /// All forms
    async fn find_all(&self) -> Result<Vec<FormRecord>, RepositoryError>;

    /// Forms created by or assigned to the user; everything for admins
    async fn find_visible_to(&self, identity: &Identity) -> Result<Vec<FormRecord>, RepositoryError>;

    /// Save form (insert or update)
    async fn save(&self, record: &FormRecord) -> Result<(), RepositoryError>;

    /// Delete form
    async fn delete(&self, id: FormId) -> Result<(), RepositoryError>;
}

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish domain events
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError>;
}

/// Repository error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Connection error: {0}")]
    ConnectionError(String),
    #[error("Query error: {0}")]
    QueryError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

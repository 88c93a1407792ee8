//! In-memory repository implementation
//!
//! Rows mirror the relational layout: scalar columns next to a
//! `formDefinition` JSON text holding `{fields, customComponents}`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::aggregates::{FormDocument, FormRecord};
use crate::domain::value_objects::{FormId, Identity};
use crate::ports::outbound::{FormRepository, RepositoryError};

/// One stored form row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredForm {
    pub id: u64,
    pub menu_id: String,
    pub label: String,
    pub form_width: String,
    pub layout: String,
    pub form_definition: String,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub status: String,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredForm {
    pub fn from_record(record: &FormRecord) -> Result<Self, RepositoryError> {
        let document = record.document();
        let form_definition = serde_json::to_string(&document.definition())
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(Self {
            id: record.id().value(),
            menu_id: document.menu_id.clone(),
            label: document.label.clone(),
            form_width: document.form_width.clone(),
            layout: document.layout.clone(),
            form_definition,
            created_by: record.created_by().to_string(),
            assigned_to: record.assigned_to().map(String::from),
            status: record.status().to_string(),
            priority: record.priority().to_string(),
            created_at: record.created_at(),
            updated_at: record.updated_at(),
        })
    }

    pub fn to_record(&self) -> Result<FormRecord, RepositoryError> {
        let definition: Value = serde_json::from_str(&self.form_definition)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        let mut document = FormDocument::new(self.menu_id.clone(), self.label.clone());
        document.form_width = self.form_width.clone();
        document.layout = self.layout.clone();
        document.load_definition(&definition);

        let status = self.status.parse().map_err(RepositoryError::SerializationError)?;
        let priority = self.priority.parse().map_err(RepositoryError::SerializationError)?;

        Ok(FormRecord::restore(
            FormId::new(self.id),
            document,
            self.created_by.clone(),
            self.assigned_to.clone(),
            status,
            priority,
            self.created_at,
            self.updated_at,
        ))
    }

    fn visible_to(&self, identity: &Identity) -> bool {
        identity.is_admin()
            || self.created_by == identity.user_id
            || self.assigned_to.as_deref() == Some(identity.user_id.as_str())
    }
}

/// In-memory form repository
pub struct InMemoryFormRepository {
    rows: RwLock<BTreeMap<u64, StoredForm>>,
    sequence: AtomicU64,
}

impl Default for InMemoryFormRepository {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            sequence: AtomicU64::new(1),
        }
    }
}

impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Raw row, as a database would hold it
    pub fn row(&self, id: FormId) -> Option<StoredForm> {
        self.rows.read().get(&id.value()).cloned()
    }

    fn collect<F>(&self, filter: F) -> Result<Vec<FormRecord>, RepositoryError>
    where
        F: Fn(&StoredForm) -> bool,
    {
        self.rows
            .read()
            .values()
            .filter(|row| filter(*row))
            .map(StoredForm::to_record)
            .collect()
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn next_id(&self) -> Result<FormId, RepositoryError> {
        Ok(FormId::new(self.sequence.fetch_add(1, Ordering::SeqCst)))
    }

    async fn find_by_id(&self, id: FormId) -> Result<Option<FormRecord>, RepositoryError> {
        self.rows.read().get(&id.value()).map(StoredForm::to_record).transpose()
    }

    async fn find_by_menu_id(&self, menu_id: &str) -> Result<Option<FormRecord>, RepositoryError> {
        self.rows
            .read()
            .values()
            .find(|row| row.menu_id == menu_id)
            .map(StoredForm::to_record)
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<FormRecord>, RepositoryError> {
        self.collect(|_| true)
    }

    async fn find_visible_to(&self, identity: &Identity) -> Result<Vec<FormRecord>, RepositoryError> {
        self.collect(|row| row.visible_to(identity))
    }

    async fn save(&self, record: &FormRecord) -> Result<(), RepositoryError> {
        let row = StoredForm::from_record(record)?;
        let mut rows = self.rows.write();
        if rows.values().any(|r| r.menu_id == row.menu_id && r.id != row.id) {
            return Err(RepositoryError::DuplicateKey(row.menu_id));
        }
        rows.insert(row.id, row);
        Ok(())
    }

    async fn delete(&self, id: FormId) -> Result<(), RepositoryError> {
        self.rows
            .write()
            .remove(&id.value())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

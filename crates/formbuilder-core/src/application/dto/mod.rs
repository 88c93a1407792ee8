//! Data Transfer Objects (DTOs)
//!
//! Objects for transferring data across boundaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{CustomComponent, FieldNode, FormRecord, FormStatus, Priority};

// =============================================================================
// Form Commands
// =============================================================================

/// New form; every attribute is optional
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateFormCommand {
    pub menu_id: Option<String>,
    pub label: Option<String>,
    pub form_width: Option<String>,
    pub layout: Option<String>,
    pub fields: Option<Vec<FieldNode>>,
    pub custom_components: Option<Vec<CustomComponent>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignFormCommand {
    pub user_id: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateStatusCommand {
    pub status: Option<FormStatus>,
    pub priority: Option<Priority>,
}

// =============================================================================
// Views (Read Models)
// =============================================================================

/// Full form with its document
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub id: u64,
    pub menu_id: String,
    pub label: String,
    pub form_width: String,
    pub layout: String,
    pub fields: Vec<FieldNode>,
    pub custom_components: Vec<CustomComponent>,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub status: FormStatus,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&FormRecord> for FormView {
    fn from(record: &FormRecord) -> Self {
        let document = record.document();
        Self {
            id: record.id().value(),
            menu_id: document.menu_id.clone(),
            label: document.label.clone(),
            form_width: document.form_width.clone(),
            layout: document.layout.clone(),
            fields: document.fields.clone(),
            custom_components: document.custom_components.clone(),
            created_by: record.created_by().to_string(),
            assigned_to: record.assigned_to().map(String::from),
            status: record.status(),
            priority: record.priority(),
            created_at: record.created_at(),
            updated_at: record.updated_at(),
        }
    }
}

/// List entry without the field tree
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub id: u64,
    pub menu_id: String,
    pub label: String,
    pub layout: String,
    pub field_count: usize,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub status: FormStatus,
    pub priority: Priority,
    pub updated_at: DateTime<Utc>,
}

impl From<&FormRecord> for FormSummary {
    fn from(record: &FormRecord) -> Self {
        Self {
            id: record.id().value(),
            menu_id: record.menu_id().to_string(),
            label: record.label().to_string(),
            layout: record.document().layout.clone(),
            field_count: record.document().field_count(),
            created_by: record.created_by().to_string(),
            assigned_to: record.assigned_to().map(String::from),
            status: record.status(),
            priority: record.priority(),
            updated_at: record.updated_at(),
        }
    }
}

//! Domain Events
//!
//! Events raised by form records to communicate state changes.

use chrono::{DateTime, Utc};

use crate::domain::aggregates::form_record::{FormStatus, Priority};
use crate::domain::value_objects::FormId;

/// All domain events of the form builder
#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Form(FormEvent),
}

/// Form-related domain events
#[derive(Clone, Debug, PartialEq)]
pub enum FormEvent {
    Created {
        form_id: FormId,
        menu_id: String,
        created_by: String,
        created_at: DateTime<Utc>,
    },

    Saved {
        form_id: FormId,
        saved_by: String,
        saved_at: DateTime<Utc>,
    },

    Assigned {
        form_id: FormId,
        label: String,
        assignee: String,
        assigned_by: String,
        assigned_at: DateTime<Utc>,
    },

    StatusChanged {
        form_id: FormId,
        label: String,
        created_by: String,
        changed_by: String,
        status: FormStatus,
        priority: Priority,
        changed_at: DateTime<Utc>,
    },

    Deleted {
        form_id: FormId,
        deleted_by: String,
    },
}

impl DomainEvent {
    /// Get the aggregate ID this event belongs to
    pub fn form_id(&self) -> FormId {
        match self {
            DomainEvent::Form(e) => match e {
                FormEvent::Created { form_id, .. }
                | FormEvent::Saved { form_id, .. }
                | FormEvent::Assigned { form_id, .. }
                | FormEvent::StatusChanged { form_id, .. }
                | FormEvent::Deleted { form_id, .. } => *form_id,
            },
        }
    }

    /// Get event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::Form(e) => match e {
                FormEvent::Created { .. } => "form.created",
                FormEvent::Saved { .. } => "form.saved",
                FormEvent::Assigned { .. } => "form.assigned",
                FormEvent::StatusChanged { .. } => "form.status_changed",
                FormEvent::Deleted { .. } => "form.deleted",
            },
        }
    }
}

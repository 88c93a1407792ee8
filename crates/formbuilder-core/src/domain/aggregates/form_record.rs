//! Form Record Aggregate
//!
//! A persisted form document with ownership, assignment and task status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::document::FormDocument;
use crate::domain::events::{DomainEvent, FormEvent};
use crate::domain::value_objects::{FormId, Identity};

/// Form record aggregate root
#[derive(Clone, Debug)]
pub struct FormRecord {
    id: FormId,
    document: FormDocument,
    created_by: String,
    assigned_to: Option<String>,
    status: FormStatus,
    priority: Priority,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl FormRecord {
    /// Create a new record owned by `owner`
    pub fn create(id: FormId, document: FormDocument, owner: &Identity, now: DateTime<Utc>) -> Self {
        let mut record = Self {
            id,
            document,
            created_by: owner.user_id.clone(),
            assigned_to: None,
            status: FormStatus::Draft,
            priority: Priority::Medium,
            created_at: now,
            updated_at: now,
            events: vec![],
        };

        record.raise_event(DomainEvent::Form(FormEvent::Created {
            form_id: id,
            menu_id: record.document.menu_id.clone(),
            created_by: record.created_by.clone(),
            created_at: now,
        }));

        record
    }

    /// Rebuild from storage; raises nothing
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: FormId,
        document: FormDocument,
        created_by: String,
        assigned_to: Option<String>,
        status: FormStatus,
        priority: Priority,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            document,
            created_by,
            assigned_to,
            status,
            priority,
            created_at,
            updated_at,
            events: vec![],
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> FormId { self.id }
    pub fn document(&self) -> &FormDocument { &self.document }
    pub fn menu_id(&self) -> &str { &self.document.menu_id }
    pub fn label(&self) -> &str { &self.document.label }
    pub fn created_by(&self) -> &str { &self.created_by }
    pub fn assigned_to(&self) -> Option<&str> { self.assigned_to.as_deref() }
    pub fn status(&self) -> FormStatus { self.status }
    pub fn priority(&self) -> Priority { self.priority }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    /// Admin, creator or assignee
    pub fn is_visible_to(&self, identity: &Identity) -> bool {
        identity.is_admin()
            || self.created_by == identity.user_id
            || self.assigned_to.as_deref() == Some(identity.user_id.as_str())
    }

    /// Admin or creator
    pub fn can_delete(&self, identity: &Identity) -> bool {
        identity.is_admin() || self.created_by == identity.user_id
    }

    // =========================================================================
    // Business Operations
    // =========================================================================

    /// Replace the document with a newer snapshot
    pub fn save_document(&mut self, document: FormDocument, actor: &Identity, now: DateTime<Utc>) {
        self.document = document;
        self.touch(now);

        self.raise_event(DomainEvent::Form(FormEvent::Saved {
            form_id: self.id,
            saved_by: actor.user_id.clone(),
            saved_at: now,
        }));
    }

    /// Assign to a user; the task starts over at `todo`
    pub fn assign(&mut self, assignee: impl Into<String>, actor: &Identity, now: DateTime<Utc>) {
        let assignee = assignee.into();
        self.assigned_to = Some(assignee.clone());
        self.status = FormStatus::Todo;
        self.touch(now);

        self.raise_event(DomainEvent::Form(FormEvent::Assigned {
            form_id: self.id,
            label: self.document.label.clone(),
            assignee,
            assigned_by: actor.user_id.clone(),
            assigned_at: now,
        }));
    }

    /// Change status and/or priority. Returns false when neither is given.
    pub fn update_status(
        &mut self,
        status: Option<FormStatus>,
        priority: Option<Priority>,
        actor: &Identity,
        now: DateTime<Utc>,
    ) -> bool {
        if status.is_none() && priority.is_none() {
            return false;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        self.touch(now);

        self.raise_event(DomainEvent::Form(FormEvent::StatusChanged {
            form_id: self.id,
            label: self.document.label.clone(),
            created_by: self.created_by.clone(),
            changed_by: actor.user_id.clone(),
            status: self.status,
            priority: self.priority,
            changed_at: now,
        }));
        true
    }

    /// Mark for deletion; the repository does the removal
    pub fn mark_deleted(&mut self, actor: &Identity) {
        self.raise_event(DomainEvent::Form(FormEvent::Deleted {
            form_id: self.id,
            deleted_by: actor.user_id.clone(),
        }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

// =============================================================================
// Supporting Types
// =============================================================================

/// Task status of an assigned form
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    #[default]
    Draft,
    Todo,
    InProgress,
    Review,
    Completed,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Completed => "completed",
        }
    }

    /// Phrase used in status notifications
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::Draft => "updated",
            Self::Todo => "moved to To Do",
            Self::InProgress => "started working on",
            Self::Review => "submitted for review",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "review" => Ok(Self::Review),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

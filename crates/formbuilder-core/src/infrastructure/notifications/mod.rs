//! Notification center
//!
//! In-process event publisher that turns assignment and status events into
//! per-user inbox entries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::aggregates::{FormStatus, Priority};
use crate::domain::events::{DomainEvent, FormEvent};
use crate::domain::services::{Clock, SystemClock};
use crate::ports::outbound::{EventPublisher, RepositoryError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Assignment,
    StatusUpdate,
}

/// One inbox entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub form_id: u64,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Per-user notification inboxes
pub struct NotificationCenter {
    entries: RwLock<Vec<Notification>>,
    sequence: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            sequence: AtomicU64::new(1),
            clock,
        }
    }

    /// Entries for `user_id`, newest first
    pub fn inbox(&self, user_id: &str) -> Vec<Notification> {
        let mut inbox: Vec<Notification> = self
            .entries
            .read()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        inbox.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        inbox
    }

    pub fn unread_count(&self, user_id: &str) -> usize {
        self.entries
            .read()
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count()
    }

    /// Mark one of the user's entries read. False if it is not theirs.
    pub fn mark_read(&self, id: u64, user_id: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|n| n.id == id && n.user_id == user_id) {
            Some(entry) => {
                if !entry.read {
                    entry.read = true;
                    entry.read_at = Some(now);
                }
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&self, user_id: &str) -> usize {
        let now = self.clock.now();
        let mut marked = 0;
        for entry in self.entries.write().iter_mut().filter(|n| n.user_id == user_id && !n.read) {
            entry.read = true;
            entry.read_at = Some(now);
            marked += 1;
        }
        marked
    }

    fn push(&self, user_id: &str, kind: NotificationKind, title: &str, message: String, priority: Priority, form_id: u64) {
        let notification = Notification {
            id: self.sequence.fetch_add(1, Ordering::SeqCst),
            user_id: user_id.to_string(),
            kind,
            title: title.to_string(),
            message,
            priority,
            form_id,
            read: false,
            created_at: self.clock.now(),
            read_at: None,
        };
        info!(user = %user_id, form_id, title, "Notification created");
        self.entries.write().push(notification);
    }

    fn handle(&self, event: &FormEvent) {
        match event {
            FormEvent::Assigned { form_id, label, assignee, assigned_by, .. } => self.push(
                assignee,
                NotificationKind::Assignment,
                "New Form Assigned",
                format!("You have been assigned to form \"{}\" by {}", label, assigned_by),
                Priority::High,
                form_id.value(),
            ),
            FormEvent::StatusChanged { form_id, label, created_by, changed_by, status, .. } => {
                if created_by == changed_by {
                    return;
                }
                let priority = match status {
                    FormStatus::Review | FormStatus::Completed => Priority::High,
                    _ => Priority::Medium,
                };
                self.push(
                    created_by,
                    NotificationKind::StatusUpdate,
                    "Task Status Updated",
                    format!("{} has {} \"{}\"", changed_by, status.phrase(), label),
                    priority,
                    form_id.value(),
                );
            }
            _ => {}
        }
    }
}

#[async_trait]
impl EventPublisher for NotificationCenter {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        for event in &events {
            debug!(event = event.event_type(), form_id = %event.form_id(), "Publishing event");
            let DomainEvent::Form(form_event) = event;
            self.handle(form_event);
        }
        Ok(())
    }
}

/// Publisher that drops every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::ManualClock;
    use crate::domain::value_objects::FormId;

    fn status_event(status: FormStatus, changed_by: &str) -> DomainEvent {
        DomainEvent::Form(FormEvent::StatusChanged {
            form_id: FormId::new(3),
            label: "Payroll".into(),
            created_by: "admin-1".into(),
            changed_by: changed_by.into(),
            status,
            priority: Priority::Medium,
            changed_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_status_phrases_and_priority() {
        let center = NotificationCenter::new();
        center
            .publish(vec![
                status_event(FormStatus::InProgress, "bob"),
                status_event(FormStatus::Completed, "bob"),
            ])
            .await
            .unwrap();

        let inbox = center.inbox("admin-1");
        assert_eq!(inbox.len(), 2);
        let messages: Vec<&str> = inbox.iter().map(|n| n.message.as_str()).collect();
        assert!(messages.contains(&"bob has started working on \"Payroll\""));
        assert!(messages.contains(&"bob has completed \"Payroll\""));
        let completed = inbox.iter().find(|n| n.message.contains("completed")).unwrap();
        assert_eq!(completed.priority, Priority::High);
        let started = inbox.iter().find(|n| n.message.contains("started")).unwrap();
        assert_eq!(started.priority, Priority::Medium);
    }

    #[tokio::test]
    async fn test_creator_is_not_notified_of_own_change() {
        let center = NotificationCenter::new();
        center.publish(vec![status_event(FormStatus::Todo, "admin-1")]).await.unwrap();
        assert!(center.inbox("admin-1").is_empty());
    }

    #[tokio::test]
    async fn test_read_tracking() {
        let clock = Arc::new(ManualClock::new(1_000));
        let center = NotificationCenter::with_clock(clock.clone());
        center.publish(vec![status_event(FormStatus::Review, "bob")]).await.unwrap();
        clock.advance(10);
        center.publish(vec![status_event(FormStatus::Todo, "bob")]).await.unwrap();

        let inbox = center.inbox("admin-1");
        assert_eq!(inbox[0].message, "bob has moved to To Do \"Payroll\"");
        assert_eq!(center.unread_count("admin-1"), 2);

        assert!(!center.mark_read(inbox[0].id, "someone-else"));
        assert!(center.mark_read(inbox[0].id, "admin-1"));
        assert_eq!(center.unread_count("admin-1"), 1);
        assert_eq!(center.mark_all_read("admin-1"), 1);
        assert_eq!(center.unread_count("admin-1"), 0);
    }
}

//! Infrastructure layer
//!
//! In-memory adapters for the outbound ports.

pub mod notifications;
pub mod persistence;

pub use notifications::{NoOpEventPublisher, Notification, NotificationCenter, NotificationKind};
pub use persistence::{InMemoryFormRepository, StoredForm};

//! Domain Layer
//!
//! Field tree, form document, form records and the pure domain services.

pub mod aggregates;
pub mod events;
pub mod services;
pub mod value_objects;

pub use aggregates::*;
pub use events::{DomainEvent, FormEvent};
pub use value_objects::*;

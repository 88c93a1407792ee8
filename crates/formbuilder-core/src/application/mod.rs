//! Application layer
//!
//! Orchestrates use cases, the interactive editor and auto-save.

pub mod autosave;
pub mod commands;
pub mod dto;
pub mod editor;

pub use autosave::{AutoSaveConfig, AutoSaver, SaveStatus, SaveTarget, ServiceSaveTarget};
pub use commands::FormService;
pub use dto::*;
pub use editor::FormEditor;

//! Domain services module

pub mod clock;
pub mod validator;

pub use clock::{Clock, IdGenerator, ManualClock, SystemClock};
pub use validator::{ValidationReport, Validator};

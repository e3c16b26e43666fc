//! Appointment booking workflow: date and scope selection, unbooked-slot
//! lookup and submission, driven by a single [`BookingDialog`] state machine.

pub mod backend;
pub mod date_selector;
pub mod machine;
pub mod models;
pub mod scope;
pub mod session;
pub mod slots;
pub mod submitter;

pub use backend::{HttpSchedulingBackend, SchedulingBackend};
pub use date_selector::DateSelector;
pub use machine::{BookingDialog, Effect, Event};
pub use models::*;
pub use scope::ScopeSelector;
pub use session::{BookingSession, Signal};
pub use slots::SlotView;

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use appointment_cell::models::Appointment;
use doctor_cell::models::TimeSlot;
use shared_models::RecordId;

pub use shared_models::CallerRole;

/// Stamp carried by every asynchronous request the dialog issues. Only the
/// most recently issued ticket of each kind is honoured when results arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub(crate) u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// In-progress booking, owned by one open dialog and discarded when it closes.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub date: NaiveDate,
    pub branch: Option<String>,
    pub doctor_id: Option<RecordId>,
    pub purpose: String,
    /// Always one of the slots returned for the current `(date, doctor_id)`.
    pub slot: Option<TimeSlot>,
    /// Staff bookings only.
    pub client_id: Option<RecordId>,
}

impl BookingDraft {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            branch: None,
            doctor_id: None,
            purpose: String::new(),
            slot: None,
            client_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftField {
    Purpose,
    Branch,
    Doctor,
    Slot,
    Client,
}

impl DraftField {
    pub fn missing_message(self) -> &'static str {
        match self {
            DraftField::Purpose => "Purpose is required",
            DraftField::Branch => "Please select a branch",
            DraftField::Doctor => "Please select a doctor",
            DraftField::Slot => "Please select a time slot",
            DraftField::Client => "Please select a client",
        }
    }
}

/// Helper text per draft field, collected from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<DraftField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: DraftField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn missing(&mut self, field: DraftField) {
        self.insert(field, field.missing_message());
    }

    pub fn clear(&mut self, field: DraftField) {
        self.0.remove(&field);
    }

    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: DraftField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> Vec<DraftField> {
        self.0.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Lifecycle of one booking dialog. `Idle` is the closed dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    /// Open, but the doctor (or, for clients, the branch) is not chosen yet.
    ScopeIncomplete,
    SlotsLoading { ticket: Ticket },
    SlotsReady(Vec<TimeSlot>),
    /// Nothing bookable. `failed` distinguishes a failed lookup from an empty one.
    SlotsEmpty { failed: bool },
    Submitting { ticket: Ticket },
    /// Closed after a submission.
    Done(Outcome),
}

impl Phase {
    pub fn is_open(&self) -> bool {
        !matches!(self, Phase::Idle | Phase::Done(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient notification (snackbar) raised by the dialog itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// What the enclosing page is told once a submission settles. Refreshing any
/// appointment listing is the page's job.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Booked {
        appointment: Appointment,
        message: String,
    },
    Failed {
        message: String,
        /// HTTP status when the server answered; kept for diagnostics only.
        status: Option<u16>,
    },
}

impl BookingOutcome {
    pub fn message(&self) -> &str {
        match self {
            BookingOutcome::Booked { message, .. } | BookingOutcome::Failed { message, .. } => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BookingOutcome::Booked { .. })
    }
}

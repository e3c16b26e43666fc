use std::collections::VecDeque;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::debug;

use shared_models::{CallerRole, RecordId};

use crate::backend::SchedulingBackend;
use crate::machine::{BookingDialog, Effect, Event};
use crate::models::{BookingOutcome, Notice};

/// Something the page hosting the dialog has to show or react to.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Notice(Notice),
    Outcome(BookingOutcome),
}

/// Runs a [`BookingDialog`] against a backend: every event is applied, the
/// requests it triggers are performed, and their results fed back until the
/// dialog settles.
pub struct BookingSession<B: SchedulingBackend> {
    dialog: BookingDialog,
    backend: Arc<B>,
}

impl<B: SchedulingBackend> BookingSession<B> {
    pub fn new(dialog: BookingDialog, backend: Arc<B>) -> Self {
        Self { dialog, backend }
    }

    pub fn dialog(&self) -> &BookingDialog {
        &self.dialog
    }

    pub async fn dispatch(&mut self, event: Event) -> Vec<Signal> {
        let mut signals = Vec::new();
        let mut queue: VecDeque<Effect> = self.dialog.handle(event).into();

        while !queue.is_empty() {
            let mut requests = Vec::new();
            for effect in queue.drain(..) {
                match effect {
                    Effect::Notify(notice) => signals.push(Signal::Notice(notice)),
                    Effect::Emit(outcome) => signals.push(Signal::Outcome(outcome)),
                    request => requests.push(request),
                }
            }

            if requests.is_empty() {
                break;
            }

            // Independent requests run together; results are applied in the
            // order they were triggered.
            let role = self.dialog.role();
            let backend = Arc::clone(&self.backend);
            let results = join_all(requests.into_iter().map(|r| perform(backend.as_ref(), role, r))).await;

            for event in results.into_iter().flatten() {
                queue.extend(self.dialog.handle(event));
            }
        }

        signals
    }

    pub async fn open(&mut self) -> Vec<Signal> {
        self.dispatch(Event::Open).await
    }

    pub async fn close(&mut self) -> Vec<Signal> {
        self.dispatch(Event::Close).await
    }

    pub async fn select_date(&mut self, date: NaiveDate) -> Vec<Signal> {
        self.dispatch(Event::DateChanged(date)).await
    }

    pub async fn select_branch(&mut self, branch: &str) -> Vec<Signal> {
        self.dispatch(Event::BranchChanged(branch.to_string())).await
    }

    pub async fn select_doctor(&mut self, doctor_id: Option<RecordId>) -> Vec<Signal> {
        self.dispatch(Event::DoctorChanged(doctor_id)).await
    }

    pub async fn select_client(&mut self, client_id: Option<RecordId>) -> Vec<Signal> {
        self.dispatch(Event::ClientChanged(client_id)).await
    }

    pub async fn set_purpose(&mut self, purpose: &str) -> Vec<Signal> {
        self.dispatch(Event::PurposeChanged(purpose.to_string())).await
    }

    pub async fn pick_slot(&mut self, slot_id: RecordId) -> Vec<Signal> {
        self.dispatch(Event::SlotPicked(slot_id)).await
    }

    pub async fn submit(&mut self) -> Vec<Signal> {
        self.dispatch(Event::Submit).await
    }
}

async fn perform<B: SchedulingBackend + ?Sized>(backend: &B, role: CallerRole, effect: Effect) -> Option<Event> {
    match effect {
        Effect::LoadDoctors { ticket } => Some(Event::DoctorsLoaded {
            ticket,
            result: backend.active_doctors().await,
        }),
        Effect::LoadRoster { ticket } => Some(Event::RosterLoaded {
            ticket,
            result: backend.branch_roster().await,
        }),
        Effect::LoadPatients { ticket } => Some(Event::PatientsLoaded {
            ticket,
            result: backend.patients().await,
        }),
        Effect::LoadSlots { ticket, query } => Some(Event::SlotsLoaded {
            ticket,
            result: backend.unbooked_slots(&query).await,
        }),
        Effect::CreateAppointment { ticket, request } => Some(Event::SubmitFinished {
            ticket,
            result: backend.create_appointment(role, &request).await,
        }),
        Effect::Notify(_) | Effect::Emit(_) => {
            debug!("Signal effects are not performed");
            None
        }
    }
}

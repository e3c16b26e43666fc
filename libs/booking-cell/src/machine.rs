use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use appointment_cell::models::{Appointment, AppointmentError, CreateAppointmentRequest};
use doctor_cell::models::{BranchRoster, Doctor, DoctorSummary, SlotQuery, TimeSlot};
use patient_cell::Patient;
use shared_models::{AppError, CallerRole, RecordId};
use shared_utils::Clock;

use crate::date_selector::DateSelector;
use crate::models::{
    BookingDraft, BookingOutcome, DraftField, FieldErrors, Notice, Outcome, Phase, Ticket,
};
use crate::scope::ScopeSelector;
use crate::slots::{is_slot_disabled, slot_views, SlotView};
use crate::submitter::{confirmation_message, validate_draft, BOOKING_FAILED_MESSAGE};

pub const SLOTS_FAILED_MESSAGE: &str = "Could not load available slots. Please try again.";

/// Inputs to the dialog: user edits and the results of requests it issued.
#[derive(Debug, Clone)]
pub enum Event {
    Open,
    Close,
    DateChanged(NaiveDate),
    BranchChanged(String),
    DoctorChanged(Option<RecordId>),
    ClientChanged(Option<RecordId>),
    PurposeChanged(String),
    SlotPicked(RecordId),
    Submit,
    DoctorsLoaded { ticket: Ticket, result: Result<Vec<Doctor>, AppError> },
    RosterLoaded { ticket: Ticket, result: Result<BranchRoster, AppError> },
    PatientsLoaded { ticket: Ticket, result: Result<Vec<Patient>, AppError> },
    SlotsLoaded { ticket: Ticket, result: Result<Vec<TimeSlot>, AppError> },
    SubmitFinished { ticket: Ticket, result: Result<Appointment, AppointmentError> },
}

/// Work the dialog asks its driver to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadDoctors { ticket: Ticket },
    LoadRoster { ticket: Ticket },
    LoadPatients { ticket: Ticket },
    LoadSlots { ticket: Ticket, query: SlotQuery },
    CreateAppointment { ticket: Ticket, request: CreateAppointmentRequest },
    Notify(Notice),
    Emit(BookingOutcome),
}

/// One booking dialog. All state changes go through [`BookingDialog::handle`].
///
/// Requests are stamped with tickets; a result is applied only while its
/// ticket is the one the dialog is still waiting for, so a slower response
/// to an older trigger, or any response arriving after close, is dropped.
pub struct BookingDialog {
    role: CallerRole,
    date_selector: DateSelector,
    clock: Arc<dyn Clock>,
    phase: Phase,
    draft: BookingDraft,
    scope: ScopeSelector,
    field_errors: FieldErrors,
    last_ticket: u64,
    pending_doctors: Option<Ticket>,
    pending_patients: Option<Ticket>,
}

impl BookingDialog {
    pub fn new(role: CallerRole, date_selector: DateSelector, clock: Arc<dyn Clock>) -> Self {
        let today = clock.today();
        let draft = BookingDraft::empty(date_selector.clamp(None, today));

        Self {
            role,
            date_selector,
            clock,
            phase: Phase::Idle,
            draft,
            scope: ScopeSelector::new(role),
            field_errors: FieldErrors::new(),
            last_ticket: 0,
            pending_doctors: None,
            pending_patients: None,
        }
    }

    pub fn role(&self) -> CallerRole {
        self.role
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn scope(&self) -> &ScopeSelector {
        &self.scope
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn date_selector(&self) -> &DateSelector {
        &self.date_selector
    }

    pub fn is_date_disabled(&self, date: NaiveDate) -> bool {
        self.date_selector.is_disabled(date, self.clock.today())
    }

    pub fn branch_options(&self) -> Vec<String> {
        self.scope.branch_options()
    }

    pub fn doctor_options(&self) -> Vec<DoctorSummary> {
        self.scope.doctor_options(self.draft.branch.as_deref())
    }

    pub fn doctor_selection_enabled(&self) -> bool {
        self.is_open() && !self.is_submitting() && !self.doctor_options().is_empty()
    }

    pub fn doctor_notice(&self) -> Option<&'static str> {
        if !self.is_open() {
            return None;
        }
        self.scope.doctor_notice(self.draft.branch.as_deref())
    }

    pub fn patient_options(&self, query: &str) -> Vec<&Patient> {
        self.scope.patient_options(query)
    }

    /// Slot picker contents; empty unless slots are loaded.
    pub fn slot_views(&self) -> Vec<SlotView> {
        match &self.phase {
            Phase::SlotsReady(slots) => {
                slot_views(slots, self.draft.date, self.draft.slot.as_ref(), self.clock.now())
            }
            _ => Vec::new(),
        }
    }

    pub fn submit_enabled(&self) -> bool {
        matches!(self.phase, Phase::SlotsReady(_))
            && self.draft.slot.is_some()
            && !self.draft.purpose.trim().is_empty()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Open => self.open(),
            Event::Close => self.close(),
            Event::DoctorsLoaded { ticket, result } => self.doctors_loaded(ticket, result),
            Event::RosterLoaded { ticket, result } => self.roster_loaded(ticket, result),
            Event::PatientsLoaded { ticket, result } => self.patients_loaded(ticket, result),
            Event::SlotsLoaded { ticket, result } => self.slots_loaded(ticket, result),
            Event::SubmitFinished { ticket, result } => self.submit_finished(ticket, result),
            edit => {
                if !self.is_open() || self.is_submitting() {
                    debug!("Ignoring {:?} while dialog is {:?}", edit, self.phase);
                    return Vec::new();
                }
                self.edit(edit)
            }
        }
    }

    fn edit(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::DateChanged(date) => self.change_date(date),
            Event::BranchChanged(input) => self.change_branch(&input),
            Event::DoctorChanged(doctor_id) => self.change_doctor(doctor_id),
            Event::ClientChanged(client_id) => {
                self.change_client(client_id);
                Vec::new()
            }
            Event::PurposeChanged(purpose) => {
                if !purpose.trim().is_empty() {
                    self.field_errors.clear(DraftField::Purpose);
                }
                self.draft.purpose = purpose;
                Vec::new()
            }
            Event::SlotPicked(slot_id) => {
                self.pick_slot(&slot_id);
                Vec::new()
            }
            Event::Submit => self.submit(),
            _ => Vec::new(),
        }
    }

    fn next_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        Ticket(self.last_ticket)
    }

    fn reset(&mut self) {
        let today = self.clock.today();
        self.draft = BookingDraft::empty(self.date_selector.clamp(None, today));
        self.scope = ScopeSelector::new(self.role);
        self.field_errors = FieldErrors::new();
        self.pending_doctors = None;
        self.pending_patients = None;
    }

    fn open(&mut self) -> Vec<Effect> {
        if self.is_open() {
            debug!("Booking dialog already open");
            return Vec::new();
        }

        self.reset();
        self.phase = Phase::ScopeIncomplete;
        info!("Opened {} booking dialog for {}", self.role, self.draft.date);

        let doctors_ticket = self.next_ticket();
        self.pending_doctors = Some(doctors_ticket);

        match self.role {
            CallerRole::Client => vec![Effect::LoadDoctors { ticket: doctors_ticket }],
            CallerRole::Staff => {
                let patients_ticket = self.next_ticket();
                self.pending_patients = Some(patients_ticket);
                vec![
                    Effect::LoadRoster { ticket: doctors_ticket },
                    Effect::LoadPatients { ticket: patients_ticket },
                ]
            }
        }
    }

    fn close(&mut self) -> Vec<Effect> {
        if self.is_submitting() {
            debug!("Close ignored while a booking is being submitted");
            return Vec::new();
        }
        if !self.is_open() {
            return Vec::new();
        }

        self.reset();
        self.phase = Phase::Idle;
        info!("Booking dialog closed without submitting");
        Vec::new()
    }

    fn change_date(&mut self, date: NaiveDate) -> Vec<Effect> {
        let date = self.date_selector.clamp(Some(date), self.clock.today());
        if date == self.draft.date {
            return Vec::new();
        }

        debug!("Booking date changed to {}", date);
        self.draft.date = date;
        self.draft.slot = None;
        self.refresh_slots()
    }

    fn change_branch(&mut self, input: &str) -> Vec<Effect> {
        if self.role == CallerRole::Staff {
            warn!("Branch is fixed for staff bookings, ignoring '{}'", input);
            return Vec::new();
        }

        let branch = self.scope.resolve_branch(input);
        if branch == self.draft.branch {
            return Vec::new();
        }

        debug!("Booking branch changed to {:?}", branch);
        if branch.is_some() {
            self.field_errors.clear(DraftField::Branch);
        }
        self.draft.branch = branch;
        self.draft.doctor_id = None;
        self.draft.slot = None;
        self.refresh_slots()
    }

    fn change_doctor(&mut self, doctor_id: Option<RecordId>) -> Vec<Effect> {
        if doctor_id == self.draft.doctor_id {
            return Vec::new();
        }

        if let Some(id) = &doctor_id {
            if !self.scope.has_doctor(id, self.draft.branch.as_deref()) {
                warn!("Doctor {} is not selectable for branch {:?}", id, self.draft.branch);
                return Vec::new();
            }
            self.field_errors.clear(DraftField::Doctor);
        }

        debug!("Booking doctor changed to {:?}", doctor_id);
        self.draft.doctor_id = doctor_id;
        self.draft.slot = None;
        self.refresh_slots()
    }

    fn change_client(&mut self, client_id: Option<RecordId>) {
        if self.role != CallerRole::Staff {
            warn!("Client selection only applies to staff bookings");
            return;
        }

        if let Some(id) = &client_id {
            if !self.scope.has_patient(id) {
                warn!("Patient {} is not in the patient list", id);
                return;
            }
            self.field_errors.clear(DraftField::Client);
        }
        self.draft.client_id = client_id;
    }

    fn pick_slot(&mut self, slot_id: &RecordId) {
        let Phase::SlotsReady(slots) = &self.phase else {
            debug!("No slots loaded, ignoring pick of {}", slot_id);
            return;
        };

        let Some(slot) = slots.iter().find(|s| &s.id == slot_id) else {
            warn!("Slot {} is not among the loaded slots", slot_id);
            return;
        };

        if is_slot_disabled(self.draft.date, slot.start_time(), self.clock.now()) {
            debug!("Slot {} is disabled", slot_id);
            return;
        }

        self.draft.slot = Some(slot.clone());
        self.field_errors.clear(DraftField::Slot);
    }

    fn slot_query(&self) -> Option<SlotQuery> {
        let doctor_id = self.draft.doctor_id.clone()?;

        let branch = match self.role {
            CallerRole::Client => Some(self.draft.branch.clone()?),
            CallerRole::Staff => None,
        };

        Some(SlotQuery {
            date: self.draft.date,
            doctor_id,
            branch,
        })
    }

    /// Called after any scope or date change. Supersedes whatever lookup was
    /// in flight.
    fn refresh_slots(&mut self) -> Vec<Effect> {
        match self.slot_query() {
            Some(query) => {
                let ticket = self.next_ticket();
                debug!("Requesting slots {} for doctor {} on {}", ticket, query.doctor_id, query.date);
                self.phase = Phase::SlotsLoading { ticket };
                vec![Effect::LoadSlots { ticket, query }]
            }
            None => {
                self.phase = Phase::ScopeIncomplete;
                Vec::new()
            }
        }
    }

    fn doctors_loaded(&mut self, ticket: Ticket, result: Result<Vec<Doctor>, AppError>) -> Vec<Effect> {
        if self.pending_doctors != Some(ticket) {
            debug!("Discarding stale doctor list {}", ticket);
            return Vec::new();
        }
        self.pending_doctors = None;

        match result {
            Ok(doctors) => {
                self.scope.load_doctors(doctors);
                // Branch text typed before the list arrived.
                if let Some(typed) = self.draft.branch.take() {
                    self.draft.branch = self.scope.resolve_branch(&typed);
                }
            }
            Err(e) => {
                warn!("Failed to load doctors: {}", e);
                self.scope.doctors_failed();
            }
        }
        Vec::new()
    }

    fn roster_loaded(&mut self, ticket: Ticket, result: Result<BranchRoster, AppError>) -> Vec<Effect> {
        if self.pending_doctors != Some(ticket) {
            debug!("Discarding stale branch roster {}", ticket);
            return Vec::new();
        }
        self.pending_doctors = None;

        match result {
            Ok(roster) => {
                self.scope.load_roster(roster);
                self.draft.branch = self.scope.staff_branch();
            }
            Err(e) => {
                warn!("Failed to load branch doctors: {}", e);
                self.scope.doctors_failed();
            }
        }
        Vec::new()
    }

    fn patients_loaded(&mut self, ticket: Ticket, result: Result<Vec<Patient>, AppError>) -> Vec<Effect> {
        if self.pending_patients != Some(ticket) {
            debug!("Discarding stale patient list {}", ticket);
            return Vec::new();
        }
        self.pending_patients = None;

        match result {
            Ok(patients) => self.scope.load_patients(patients),
            Err(e) => {
                warn!("Failed to load patients: {}", e);
                self.scope.patients_failed();
            }
        }
        Vec::new()
    }

    fn slots_loaded(&mut self, ticket: Ticket, result: Result<Vec<TimeSlot>, AppError>) -> Vec<Effect> {
        if self.phase != (Phase::SlotsLoading { ticket }) {
            debug!("Discarding stale slot response {}", ticket);
            return Vec::new();
        }

        self.draft.slot = None;
        match result {
            Ok(slots) if slots.is_empty() => {
                debug!("No unbooked slots for {}", self.draft.date);
                self.phase = Phase::SlotsEmpty { failed: false };
                Vec::new()
            }
            Ok(slots) => {
                debug!("{} unbooked slots for {}", slots.len(), self.draft.date);
                self.phase = Phase::SlotsReady(slots);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to load slots: {}", e);
                self.phase = Phase::SlotsEmpty { failed: true };
                vec![Effect::Notify(Notice::error(SLOTS_FAILED_MESSAGE))]
            }
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        match validate_draft(&self.draft, self.role, self.clock.now()) {
            Err(errors) => {
                debug!("Booking blocked by {} missing fields: {:?}", errors.len(), errors.fields());
                self.field_errors = errors;
                Vec::new()
            }
            Ok(request) => {
                self.field_errors = FieldErrors::new();
                let ticket = self.next_ticket();
                info!("Submitting booking {} for doctor {} on {} at {}",
                      ticket, request.doctor_id, request.appointment_date, request.from_time);
                self.phase = Phase::Submitting { ticket };
                vec![Effect::CreateAppointment { ticket, request }]
            }
        }
    }

    fn submit_finished(
        &mut self,
        ticket: Ticket,
        result: Result<Appointment, AppointmentError>,
    ) -> Vec<Effect> {
        if self.phase != (Phase::Submitting { ticket }) {
            debug!("Discarding stale submission result {}", ticket);
            return Vec::new();
        }

        let outcome = match result {
            Ok(appointment) => {
                let doctor_name = self.draft.doctor_id
                    .as_ref()
                    .and_then(|id| self.scope.doctor_name(id));
                let message = confirmation_message(&appointment, doctor_name.as_deref());
                info!("Booking {} succeeded: appointment {}", ticket, appointment.id);
                self.phase = Phase::Done(Outcome::Success);
                BookingOutcome::Booked { appointment, message }
            }
            Err(e) => {
                warn!("Booking {} failed: {}", ticket, e);
                self.phase = Phase::Done(Outcome::Failure);
                BookingOutcome::Failed {
                    message: BOOKING_FAILED_MESSAGE.to_string(),
                    status: e.status(),
                }
            }
        };

        self.reset();
        vec![Effect::Emit(outcome)]
    }
}

use chrono::NaiveDateTime;

use appointment_cell::models::{Appointment, CreateAppointmentRequest};
use shared_models::CallerRole;

use crate::models::{BookingDraft, DraftField, FieldErrors};
use crate::slots::is_slot_disabled;

pub const BOOKING_FAILED_MESSAGE: &str = "Booking failed. Please try again.";
pub const SLOT_PASSED_MESSAGE: &str = "Selected time slot has already passed";

/// Checks every required field at once and, when nothing is missing, builds
/// the create-appointment body from the draft.
pub fn validate_draft(
    draft: &BookingDraft,
    role: CallerRole,
    now: NaiveDateTime,
) -> Result<CreateAppointmentRequest, FieldErrors> {
    let mut errors = FieldErrors::new();

    let purpose = draft.purpose.trim();
    if purpose.is_empty() {
        errors.missing(DraftField::Purpose);
    }

    let branch = draft.branch.as_deref().map(str::trim).unwrap_or_default();
    if branch.is_empty() {
        errors.missing(DraftField::Branch);
    }

    if draft.doctor_id.is_none() {
        errors.missing(DraftField::Doctor);
    }

    match &draft.slot {
        None => errors.missing(DraftField::Slot),
        Some(slot) if is_slot_disabled(draft.date, slot.start_time(), now) => {
            errors.insert(DraftField::Slot, SLOT_PASSED_MESSAGE);
        }
        Some(_) => {}
    }

    if role == CallerRole::Staff && draft.client_id.is_none() {
        errors.missing(DraftField::Client);
    }

    match (&draft.doctor_id, &draft.slot) {
        (Some(doctor_id), Some(slot)) if errors.is_empty() => Ok(CreateAppointmentRequest {
            doctor_id: doctor_id.clone(),
            client_id: match role {
                CallerRole::Client => None,
                CallerRole::Staff => draft.client_id.clone(),
            },
            appointment_date: draft.date,
            from_time: slot.slot_time_from.clone(),
            to_time: slot.slot_time_to.clone(),
            purpose: purpose.to_string(),
            selected_branch: branch.to_string(),
        }),
        _ => Err(errors),
    }
}

pub fn confirmation_message(appointment: &Appointment, doctor_name: Option<&str>) -> String {
    match doctor_name {
        Some(name) => format!("Appointment booked with {} on {}", name, appointment.describe_when()),
        None => format!("Appointment booked for {}", appointment.describe_when()),
    }
}

use std::sync::Arc;

use anyhow::bail;
use chrono::NaiveDate;
use tracing::{info, warn};

use booking_cell::slots::is_slot_disabled;
use booking_cell::{
    BookingDialog, BookingOutcome, BookingSession, CallerRole, DateSelector, HttpSchedulingBackend,
    SchedulingBackend, Signal,
};
use doctor_cell::models::SlotQuery;
use doctor_cell::services::{distinct_branches, doctors_in_branch};
use patient_cell::search_patients;
use shared_models::RecordId;
use shared_utils::{Clock, SystemClock};

pub async fn list_doctors<B: SchedulingBackend>(backend: &B) -> anyhow::Result<()> {
    let doctors: Vec<_> = backend.active_doctors().await?
        .into_iter()
        .filter(|d| d.is_bookable())
        .collect();

    for branch in distinct_branches(&doctors) {
        println!("{}", branch);
        for doctor in doctors_in_branch(&doctors, &branch) {
            println!("  {:>6}  {}", doctor.id, doctor.name);
        }
    }
    Ok(())
}

pub async fn list_roster<B: SchedulingBackend>(backend: &B) -> anyhow::Result<()> {
    let roster = backend.branch_roster().await?;

    println!("{}", roster.branch);
    for doctor in &roster.doctors {
        println!("  {:>6}  {}", doctor.id, doctor.name);
    }
    Ok(())
}

pub async fn list_patients<B: SchedulingBackend>(backend: &B, query: Option<&str>) -> anyhow::Result<()> {
    let patients = backend.patients().await?;

    let matches = search_patients(&patients, query.unwrap_or_default());
    if matches.is_empty() {
        println!("No matching patients");
    }
    for patient in matches {
        println!("  {}", patient.display_label());
    }
    Ok(())
}

pub async fn list_slots<B: SchedulingBackend>(
    backend: &B,
    date: NaiveDate,
    doctor_id: RecordId,
    branch: Option<String>,
) -> anyhow::Result<()> {
    let query = SlotQuery { date, doctor_id, branch };

    let slots = backend.unbooked_slots(&query).await?;
    if slots.is_empty() {
        println!("No available slots");
        return Ok(());
    }

    let now = SystemClock.now();
    for slot in slots {
        let state = if is_slot_disabled(query.date, slot.start_time(), now) { "passed" } else { "open" };
        println!("  {:>6}  {:>8}  {}", slot.id, slot.label(), state);
    }
    Ok(())
}

pub async fn book_as_client(
    backend: Arc<HttpSchedulingBackend>,
    date: NaiveDate,
    branch: &str,
    doctor_id: RecordId,
    slot_id: RecordId,
    purpose: &str,
) -> anyhow::Result<()> {
    let mut session = new_session(CallerRole::Client, backend);
    report(session.open().await);
    select_exact_date(&mut session, date).await?;
    report(session.select_branch(branch).await);
    report(session.select_doctor(Some(doctor_id)).await);
    if let Some(notice) = session.dialog().doctor_notice() {
        warn!("{}", notice);
    }

    finish(&mut session, slot_id, purpose).await
}

pub async fn book_as_staff(
    backend: Arc<HttpSchedulingBackend>,
    client_id: RecordId,
    date: NaiveDate,
    doctor_id: RecordId,
    slot_id: RecordId,
    purpose: &str,
) -> anyhow::Result<()> {
    let mut session = new_session(CallerRole::Staff, backend);
    report(session.open().await);
    report(session.select_client(Some(client_id)).await);
    select_exact_date(&mut session, date).await?;
    report(session.select_doctor(Some(doctor_id)).await);

    finish(&mut session, slot_id, purpose).await
}

fn new_session(role: CallerRole, backend: Arc<HttpSchedulingBackend>) -> BookingSession<HttpSchedulingBackend> {
    let dialog = BookingDialog::new(role, DateSelector::new(), Arc::new(SystemClock));
    BookingSession::new(dialog, backend)
}

/// The dialog moves unavailable dates to the next valid day; the console books
/// only the day it was asked for.
async fn select_exact_date(
    session: &mut BookingSession<HttpSchedulingBackend>,
    date: NaiveDate,
) -> anyhow::Result<()> {
    report(session.select_date(date).await);
    let selected = session.dialog().draft().date;
    if selected != date {
        bail!("{} cannot be booked, the next available day is {}", date, selected);
    }
    Ok(())
}

async fn finish(
    session: &mut BookingSession<HttpSchedulingBackend>,
    slot_id: RecordId,
    purpose: &str,
) -> anyhow::Result<()> {
    report(session.pick_slot(slot_id).await);
    report(session.set_purpose(purpose).await);

    let signals = session.submit().await;
    let errors = session.dialog().field_errors();
    if !errors.is_empty() {
        for field in errors.fields() {
            println!("  {:?}: {}", field, errors.get(field).unwrap_or_default());
        }
        bail!("booking is incomplete");
    }

    for signal in signals {
        match signal {
            Signal::Outcome(BookingOutcome::Booked { message, .. }) => {
                info!("{}", message);
                println!("{}", message);
            }
            Signal::Outcome(BookingOutcome::Failed { message, status }) => {
                bail!("{} (status {:?})", message, status)
            }
            Signal::Notice(notice) => println!("{}", notice.message),
        }
    }
    Ok(())
}

fn report(signals: Vec<Signal>) {
    for signal in signals {
        if let Signal::Notice(notice) = signal {
            warn!("{}", notice.message);
        }
    }
}

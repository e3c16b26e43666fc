use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use shared_models::RecordId;
use shared_utils::{Clock, SystemClock};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Clinic appointment booking console", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Active doctors grouped by branch
    Doctors,
    /// Doctors of the signed-in receptionist's branch
    Roster,
    /// Patients of the clinic, optionally filtered by name or id
    Patients {
        query: Option<String>,
    },
    /// Unbooked slots of a doctor on a day
    Slots {
        #[arg(value_parser = parse_date, value_name = "YYYY-MM-DD")]
        date: NaiveDate,
        #[arg(value_parser = parse_record_id)]
        doctor_id: RecordId,
        branch: Option<String>,
    },
    /// Book a slot as a client
    Book {
        #[arg(value_parser = parse_booking_date, value_name = "YYYY-MM-DD")]
        date: NaiveDate,
        branch: String,
        #[arg(value_parser = parse_record_id)]
        doctor_id: RecordId,
        #[arg(value_parser = parse_record_id)]
        slot_id: RecordId,
        #[arg(required = true, num_args = 1..)]
        purpose: Vec<String>,
    },
    /// Book a slot for a patient as a receptionist
    BookFor {
        #[arg(value_parser = parse_record_id)]
        client_id: RecordId,
        #[arg(value_parser = parse_booking_date, value_name = "YYYY-MM-DD")]
        date: NaiveDate,
        #[arg(value_parser = parse_record_id)]
        doctor_id: RecordId,
        #[arg(value_parser = parse_record_id)]
        slot_id: RecordId,
        #[arg(required = true, num_args = 1..)]
        purpose: Vec<String>,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", raw))
}

fn parse_booking_date(raw: &str) -> Result<NaiveDate, String> {
    not_before(parse_date(raw)?, SystemClock.today())
}

fn not_before(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, String> {
    if date < today {
        return Err(format!("{} is in the past, appointments start from {}", date, today));
    }
    Ok(date)
}

fn parse_record_id(raw: &str) -> Result<RecordId, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("id must not be empty".to_string());
    }
    Ok(RecordId::from(raw))
}

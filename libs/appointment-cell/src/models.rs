// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::{AppError, RecordId};
use shared_utils::{format_12h, ServerTime};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// Appointment as recorded by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    #[serde(rename = "doctorId", alias = "doctor_id", default)]
    pub doctor_id: Option<RecordId>,
    #[serde(rename = "clientId", alias = "client_id", default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<RecordId>,
    #[serde(deserialize_with = "date_only")]
    pub appointment_date: NaiveDate,
    pub from_time: ServerTime,
    pub to_time: ServerTime,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(alias = "selectedBranch", alias = "branch", default)]
    pub selected_branch: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl Appointment {
    /// e.g. `2026-10-17 at 10:00 AM`
    pub fn describe_when(&self) -> String {
        format!("{} at {}", self.appointment_date.format("%Y-%m-%d"), format_12h(self.from_time.time()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    #[serde(alias = "confirmed", alias = "booked")]
    Scheduled,
    Completed,
    #[serde(alias = "canceled")]
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The backend stores dates as timestamps and may echo `2026-10-17T00:00:00.000Z`;
/// only the calendar date is meaningful.
fn date_only<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let date_part = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| de::Error::custom(format!("'{}' is not a YYYY-MM-DD date", raw)))
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Body of the create-appointment call. Times are the slot's own 24-hour text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    #[serde(rename = "doctorId")]
    pub doctor_id: RecordId,
    #[serde(rename = "clientId", default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<RecordId>,
    pub appointment_date: NaiveDate,
    pub from_time: ServerTime,
    pub to_time: ServerTime,
    pub purpose: String,
    pub selected_branch: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CreateAppointmentResponse {
    Wrapped { data: Appointment },
    Bare(Appointment),
}

impl CreateAppointmentResponse {
    pub fn into_appointment(self) -> Appointment {
        match self {
            CreateAppointmentResponse::Wrapped { data } => data,
            CreateAppointmentResponse::Bare(appointment) => appointment,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChangeRequest {
    #[serde(rename = "appointmentId")]
    pub appointment_id: RecordId,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppointmentError {
    #[error("Appointment cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Api(#[from] AppError),
}

impl AppointmentError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AppointmentError::Api(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_backend_field_names() {
        let request = CreateAppointmentRequest {
            doctor_id: RecordId::from(3u64),
            client_id: None,
            appointment_date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            from_time: ServerTime::parse("10:00:00").unwrap(),
            to_time: ServerTime::parse("10:30:00").unwrap(),
            purpose: "follow-up".to_string(),
            selected_branch: "Andheri".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "doctorId": 3,
                "appointment_date": "2026-10-17",
                "from_time": "10:00:00",
                "to_time": "10:30:00",
                "purpose": "follow-up",
                "selected_branch": "Andheri"
            })
        );
    }

    #[test]
    fn appointment_accepts_timestamp_dates_and_wrapped_records() {
        let response: CreateAppointmentResponse = serde_json::from_value(json!({
            "success": true,
            "data": {
                "id": 99,
                "doctor_id": 3,
                "appointment_date": "2026-10-17T00:00:00.000Z",
                "from_time": "10:00:00",
                "to_time": "10:30:00",
                "status": "booked"
            }
        }))
        .unwrap();

        let appointment = response.into_appointment();
        assert_eq!(appointment.appointment_date, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.describe_when(), "2026-10-17 at 10:00 AM");
    }

    #[test]
    fn missing_status_defaults_to_pending() {
        let appointment: Appointment = serde_json::from_value(json!({
            "id": "a-1",
            "appointment_date": "2026-10-17",
            "from_time": "09:00",
            "to_time": "09:30"
        }))
        .unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Pending);
    }
}

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};

use shared_config::{AppConfig, CredentialMode};

use crate::clock::FixedClock;

pub struct TestConfig {
    pub api_base_url: String,
    pub session_cookie: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            session_cookie: Some("connect.sid=test-session".to_string()),
        }
    }
}

impl TestConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            credential_mode: CredentialMode::Include,
            session_cookie: self.session_cookie.clone(),
            ..AppConfig::new(self.api_base_url.clone())
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestClock;

impl TestClock {
    /// Clock at `date` (`YYYY-MM-DD`) and `time` (`HH:MM`).
    pub fn at(date: &str, time: &str) -> Arc<FixedClock> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("bad test date {}", date));
        let time = NaiveTime::parse_from_str(time, "%H:%M")
            .unwrap_or_else(|_| panic!("bad test time {}", time));
        Arc::new(FixedClock::at(date, time))
    }
}

pub struct MockSchedulingResponses;

impl MockSchedulingResponses {
    pub fn doctor(id: u64, name: &str, branch: &str, status: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "branch": branch,
            "role": "doctor",
            "status": status
        })
    }

    pub fn staff_member(id: u64, name: &str, branch: &str, role: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "branch": branch,
            "role": role,
            "status": "active"
        })
    }

    pub fn active_doctors_response(doctors: Vec<Value>) -> Value {
        json!({ "data": doctors })
    }

    pub fn branch_doctors_response(branch: &str, doctors: &[(u64, &str)]) -> Value {
        let data: Vec<Value> = doctors
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect();

        json!({
            "success": true,
            "data": data,
            "branch": branch
        })
    }

    pub fn slots_response(slots: &[(u64, &str, &str)]) -> Value {
        let data: Vec<Value> = slots
            .iter()
            .map(|(id, from, to)| json!({
                "id": id,
                "slot_time_from": from,
                "slot_time_to": to
            }))
            .collect();

        json!({ "slots": data })
    }

    pub fn patients_response(patients: &[(u64, &str)]) -> Value {
        let data: Vec<Value> = patients
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect();

        json!({ "data": data })
    }

    pub fn appointment_response(id: u64, doctor_id: u64, date: &str, from: &str, to: &str) -> Value {
        json!({
            "id": id,
            "doctorId": doctor_id,
            "appointment_date": date,
            "from_time": from,
            "to_time": to,
            "purpose": "follow-up",
            "status": "scheduled"
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({
            "success": false,
            "message": message
        })
    }
}

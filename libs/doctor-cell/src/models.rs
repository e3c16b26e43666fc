use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use shared_models::RecordId;
use shared_utils::{iso_date, ServerTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoctorStatus {
    #[serde(alias = "Active", alias = "ACTIVE", alias = "enabled")]
    Active,
    #[serde(alias = "Inactive", alias = "INACTIVE", alias = "disabled")]
    Inactive,
}

/// Staff-directory entry as exposed to self-service clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: RecordId,
    pub name: String,
    pub branch: String,
    pub role: String,
    pub status: DoctorStatus,
}

impl Doctor {
    pub fn is_active(&self) -> bool {
        self.status == DoctorStatus::Active
    }

    /// Active and actually a doctor (the directory also lists other staff).
    pub fn is_bookable(&self) -> bool {
        self.is_active() && self.role.trim().eq_ignore_ascii_case("doctor")
    }

    pub fn works_at(&self, branch: &str) -> bool {
        self.branch.trim().eq_ignore_ascii_case(branch.trim())
    }
}

/// Doctor as listed for a receptionist's own branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: RecordId,
    pub name: String,
}

impl From<&Doctor> for DoctorSummary {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.clone(),
            name: doctor.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchDoctorsResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<DoctorSummary>,
    #[serde(default)]
    pub branch: Option<String>,
}

/// The acting receptionist's branch and the doctors who work there.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchRoster {
    pub branch: String,
    pub doctors: Vec<DoctorSummary>,
}

/// One bookable interval for one doctor on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: RecordId,
    #[serde(default, alias = "slotDate")]
    pub slot_date: Option<NaiveDate>,
    #[serde(alias = "slotTimeFrom")]
    pub slot_time_from: ServerTime,
    #[serde(alias = "slotTimeTo")]
    pub slot_time_to: ServerTime,
}

impl TimeSlot {
    pub fn start_time(&self) -> NaiveTime {
        self.slot_time_from.time()
    }

    pub fn end_time(&self) -> NaiveTime {
        self.slot_time_to.time()
    }

    pub fn label(&self) -> String {
        self.slot_time_from.label_12h()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnbookedSlotsResponse {
    pub slots: Vec<TimeSlot>,
}

/// Parameters of an unbooked-slot lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub date: NaiveDate,
    pub doctor_id: RecordId,
    /// Omitted when the backend derives the branch from the doctor.
    pub branch: Option<String>,
}

impl SlotQuery {
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("date", iso_date(self.date)),
            ("doctorId", self.doctor_id.to_string()),
        ];
        if let Some(branch) = &self.branch {
            params.push(("branch", branch.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bookable_requires_active_doctor_role() {
        let mut doctor: Doctor = serde_json::from_value(json!({
            "id": 1, "name": "Dr. Rao", "branch": "Andheri", "role": "Doctor", "status": "active"
        }))
        .unwrap();
        assert!(doctor.is_bookable());
        assert!(doctor.works_at(" andheri "));

        doctor.role = "receptionist".to_string();
        assert!(!doctor.is_bookable());

        doctor.role = "doctor".to_string();
        doctor.status = DoctorStatus::Inactive;
        assert!(!doctor.is_bookable());
    }

    #[test]
    fn unknown_status_fails_to_decode() {
        let result = serde_json::from_value::<Doctor>(json!({
            "id": 1, "name": "Dr. Rao", "branch": "Andheri", "role": "doctor", "status": "on-leave"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn slot_query_omits_missing_branch() {
        let query = SlotQuery {
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            doctor_id: RecordId::from(4u64),
            branch: None,
        };
        assert_eq!(
            query.to_query_params(),
            vec![("date", "2026-10-17".to_string()), ("doctorId", "4".to_string())]
        );
    }

    #[test]
    fn slot_decodes_camel_case_and_labels_in_twelve_hours() {
        let slot: TimeSlot = serde_json::from_value(json!({
            "id": "s-1", "slotDate": "2026-10-17", "slotTimeFrom": "13:30:00", "slotTimeTo": "14:00:00"
        }))
        .unwrap();
        assert_eq!(slot.label(), "1:30 PM");
        assert_eq!(slot.slot_date, NaiveDate::from_ymd_opt(2026, 10, 17));
    }
}

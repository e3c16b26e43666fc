use tracing::debug;

use doctor_cell::models::{BranchRoster, Doctor, DoctorSummary};
use doctor_cell::services::{distinct_branches, doctors_in_branch, match_branch};
use patient_cell::{search_patients, Patient};
use shared_models::{CallerRole, RecordId};

pub const NO_DOCTORS_NOTICE: &str = "No doctors available for this branch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    /// The fetch failed; the list is treated as empty.
    Failed,
}

/// Directory data behind branch, doctor and (staff) patient selection.
///
/// Clients pick a branch from those derived from the active-doctor list, then
/// a doctor of that branch. Staff are pinned to their own branch and pick a
/// doctor and the patient being booked for.
#[derive(Debug, Clone)]
pub struct ScopeSelector {
    role: CallerRole,
    doctors: Vec<Doctor>,
    branches: Vec<String>,
    roster: Option<BranchRoster>,
    patients: Vec<Patient>,
    doctors_state: LoadState,
    patients_state: LoadState,
}

impl ScopeSelector {
    pub fn new(role: CallerRole) -> Self {
        Self {
            role,
            doctors: Vec::new(),
            branches: Vec::new(),
            roster: None,
            patients: Vec::new(),
            doctors_state: LoadState::Pending,
            patients_state: match role {
                CallerRole::Client => LoadState::Loaded,
                CallerRole::Staff => LoadState::Pending,
            },
        }
    }

    pub fn role(&self) -> CallerRole {
        self.role
    }

    pub fn doctors_state(&self) -> LoadState {
        self.doctors_state
    }

    pub fn patients_state(&self) -> LoadState {
        self.patients_state
    }

    pub fn load_doctors(&mut self, doctors: Vec<Doctor>) {
        self.doctors = doctors.into_iter().filter(Doctor::is_bookable).collect();
        self.branches = distinct_branches(&self.doctors);
        self.doctors_state = LoadState::Loaded;
        debug!("Scope has {} doctors across {} branches", self.doctors.len(), self.branches.len());
    }

    pub fn load_roster(&mut self, roster: BranchRoster) {
        debug!("Scope pinned to branch '{}' with {} doctors", roster.branch, roster.doctors.len());
        self.roster = Some(roster);
        self.doctors_state = LoadState::Loaded;
    }

    pub fn doctors_failed(&mut self) {
        self.doctors.clear();
        self.branches.clear();
        self.roster = None;
        self.doctors_state = LoadState::Failed;
    }

    pub fn load_patients(&mut self, patients: Vec<Patient>) {
        self.patients = patients;
        self.patients_state = LoadState::Loaded;
    }

    pub fn patients_failed(&mut self) {
        self.patients.clear();
        self.patients_state = LoadState::Failed;
    }

    pub fn branch_options(&self) -> Vec<String> {
        match self.role {
            CallerRole::Client => self.branches.clone(),
            CallerRole::Staff => self.staff_branch().into_iter().collect(),
        }
    }

    /// Branch of the acting receptionist, once known.
    pub fn staff_branch(&self) -> Option<String> {
        self.roster
            .as_ref()
            .map(|r| r.branch.trim().to_string())
            .filter(|b| !b.is_empty())
    }

    /// Canonical spelling when `input` names a known branch, the trimmed input
    /// otherwise; `None` for blank input.
    pub fn resolve_branch(&self, input: &str) -> Option<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match_branch(&self.branches, trimmed).cloned().unwrap_or_else(|| trimmed.to_string()))
    }

    pub fn doctor_options(&self, branch: Option<&str>) -> Vec<DoctorSummary> {
        match self.role {
            CallerRole::Client => match branch {
                Some(branch) => doctors_in_branch(&self.doctors, branch)
                    .into_iter()
                    .map(DoctorSummary::from)
                    .collect(),
                None => Vec::new(),
            },
            CallerRole::Staff => self.roster
                .as_ref()
                .map(|r| r.doctors.clone())
                .unwrap_or_default(),
        }
    }

    pub fn has_doctor(&self, doctor_id: &RecordId, branch: Option<&str>) -> bool {
        self.doctor_options(branch).iter().any(|d| &d.id == doctor_id)
    }

    pub fn doctor_name(&self, doctor_id: &RecordId) -> Option<String> {
        match self.role {
            CallerRole::Client => self.doctors
                .iter()
                .find(|d| &d.id == doctor_id)
                .map(|d| d.name.clone()),
            CallerRole::Staff => self.roster
                .as_ref()
                .and_then(|r| r.doctors.iter().find(|d| &d.id == doctor_id))
                .map(|d| d.name.clone()),
        }
    }

    /// Inert-state notice shown in place of an empty doctor picker.
    pub fn doctor_notice(&self, branch: Option<&str>) -> Option<&'static str> {
        if self.doctors_state == LoadState::Pending {
            return None;
        }
        if self.role == CallerRole::Client && branch.is_none() {
            return None;
        }
        if self.doctor_options(branch).is_empty() {
            Some(NO_DOCTORS_NOTICE)
        } else {
            None
        }
    }

    pub fn patient_options(&self, query: &str) -> Vec<&Patient> {
        search_patients(&self.patients, query)
    }

    pub fn has_patient(&self, client_id: &RecordId) -> bool {
        self.patients.iter().any(|p| &p.id == client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctor_cell::models::DoctorStatus;

    fn doctor(id: u64, name: &str, branch: &str, status: DoctorStatus) -> Doctor {
        Doctor {
            id: RecordId::from(id),
            name: name.to_string(),
            branch: branch.to_string(),
            role: "doctor".to_string(),
            status,
        }
    }

    fn client_scope() -> ScopeSelector {
        let mut scope = ScopeSelector::new(CallerRole::Client);
        scope.load_doctors(vec![
            doctor(1, "Dr. Rao", "Andheri", DoctorStatus::Active),
            doctor(2, "Dr. Shah", "Andheri", DoctorStatus::Inactive),
            doctor(3, "Dr. Iyer", "Bandra", DoctorStatus::Active),
        ]);
        scope
    }

    #[test]
    fn client_branches_come_from_active_doctors() {
        assert_eq!(client_scope().branch_options(), vec!["Andheri".to_string(), "Bandra".to_string()]);
    }

    #[test]
    fn branch_input_is_canonicalised() {
        let scope = client_scope();
        assert_eq!(scope.resolve_branch("andheri "), Some("Andheri".to_string()));
        assert_eq!(scope.resolve_branch("Juhu"), Some("Juhu".to_string()));
        assert_eq!(scope.resolve_branch("   "), None);
    }

    #[test]
    fn doctors_are_filtered_by_branch() {
        let scope = client_scope();
        let names: Vec<String> = scope.doctor_options(Some("ANDHERI")).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Dr. Rao".to_string()]);
        assert!(scope.doctor_options(None).is_empty());
        assert!(scope.has_doctor(&RecordId::from(3u64), Some("Bandra")));
        assert!(!scope.has_doctor(&RecordId::from(3u64), Some("Andheri")));
    }

    #[test]
    fn empty_branch_raises_notice_only_after_load() {
        let pending = ScopeSelector::new(CallerRole::Client);
        assert_eq!(pending.doctor_notice(Some("Juhu")), None);

        let scope = client_scope();
        assert_eq!(scope.doctor_notice(Some("Juhu")), Some(NO_DOCTORS_NOTICE));
        assert_eq!(scope.doctor_notice(Some("Andheri")), None);
        assert_eq!(scope.doctor_notice(None), None);
    }

    #[test]
    fn staff_scope_is_pinned_to_roster_branch() {
        let mut scope = ScopeSelector::new(CallerRole::Staff);
        assert_eq!(scope.staff_branch(), None);

        scope.load_roster(BranchRoster {
            branch: "Bandra".to_string(),
            doctors: vec![DoctorSummary { id: RecordId::from(7u64), name: "Dr. Iyer".to_string() }],
        });

        assert_eq!(scope.branch_options(), vec!["Bandra".to_string()]);
        assert!(scope.has_doctor(&RecordId::from(7u64), None));
        assert_eq!(scope.doctor_name(&RecordId::from(7u64)).as_deref(), Some("Dr. Iyer"));
    }

    #[test]
    fn failed_directory_degrades_to_empty() {
        let mut scope = client_scope();
        scope.doctors_failed();
        assert!(scope.branch_options().is_empty());
        assert_eq!(scope.doctors_state(), LoadState::Failed);
        assert_eq!(scope.doctor_notice(Some("Andheri")), Some(NO_DOCTORS_NOTICE));
    }
}

use std::sync::Arc;

use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_http::RestClient;
use shared_models::{AppError, DataEnvelope};

use crate::models::{BranchDoctorsResponse, BranchRoster, Doctor};

/// Read-only access to the staff directory.
pub struct DoctorDirectoryService {
    rest: Arc<RestClient>,
    active_doctors_path: String,
    branch_doctors_path: String,
}

impl DoctorDirectoryService {
    pub fn new(rest: Arc<RestClient>, config: &AppConfig) -> Self {
        Self {
            rest,
            active_doctors_path: config.endpoints.active_doctors.clone(),
            branch_doctors_path: config.endpoints.branch_doctors.clone(),
        }
    }

    /// Doctors a client may book with: active entries whose role is `doctor`.
    pub async fn list_active_doctors(&self) -> Result<Vec<Doctor>, AppError> {
        debug!("Fetching active doctors");

        let envelope: DataEnvelope<Doctor> = self.rest
            .get(&self.active_doctors_path, &[])
            .await?;

        let total = envelope.data.len();
        let doctors: Vec<Doctor> = envelope
            .into_inner()
            .into_iter()
            .filter(Doctor::is_bookable)
            .collect();

        debug!("Directory returned {} entries, {} bookable doctors", total, doctors.len());
        Ok(doctors)
    }

    /// Doctors of the acting receptionist's branch.
    pub async fn list_branch_doctors(&self) -> Result<BranchRoster, AppError> {
        debug!("Fetching doctors for the receptionist's branch");

        let response: BranchDoctorsResponse = self.rest
            .get(&self.branch_doctors_path, &[])
            .await?;

        if !response.success {
            return Err(AppError::Decode {
                path: self.branch_doctors_path.clone(),
                message: "response reported success: false".to_string(),
            });
        }

        let branch = response.branch.unwrap_or_default().trim().to_string();
        if branch.is_empty() {
            warn!("Branch doctor lookup succeeded without naming a branch");
        }

        Ok(BranchRoster {
            branch,
            doctors: response.data,
        })
    }
}

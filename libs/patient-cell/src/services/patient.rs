use std::sync::Arc;

use tracing::debug;

use shared_config::AppConfig;
use shared_http::RestClient;
use shared_models::{AppError, DataEnvelope};

use crate::models::Patient;

pub struct PatientDirectoryService {
    rest: Arc<RestClient>,
    patients_path: String,
}

impl PatientDirectoryService {
    pub fn new(rest: Arc<RestClient>, config: &AppConfig) -> Self {
        Self {
            rest,
            patients_path: config.endpoints.patients.clone(),
        }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, AppError> {
        debug!("Fetching patient list");

        let envelope: DataEnvelope<Patient> = self.rest
            .get(&self.patients_path, &[])
            .await?;

        debug!("Fetched {} patients", envelope.data.len());
        Ok(envelope.into_inner())
    }
}

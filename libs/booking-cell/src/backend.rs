use std::sync::Arc;

use async_trait::async_trait;

use appointment_cell::models::{Appointment, AppointmentError, CreateAppointmentRequest};
use appointment_cell::services::AppointmentService;
use doctor_cell::models::{BranchRoster, Doctor, SlotQuery, TimeSlot};
use doctor_cell::services::{AvailabilityService, DoctorDirectoryService};
use patient_cell::{Patient, PatientDirectoryService};
use shared_config::AppConfig;
use shared_http::RestClient;
use shared_models::{AppError, CallerRole};

/// The scheduling backend as seen by the booking workflow.
#[async_trait]
pub trait SchedulingBackend: Send + Sync {
    async fn active_doctors(&self) -> Result<Vec<Doctor>, AppError>;

    async fn branch_roster(&self) -> Result<BranchRoster, AppError>;

    async fn patients(&self) -> Result<Vec<Patient>, AppError>;

    async fn unbooked_slots(&self, query: &SlotQuery) -> Result<Vec<TimeSlot>, AppError>;

    async fn create_appointment(
        &self,
        role: CallerRole,
        request: &CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError>;
}

/// [`SchedulingBackend`] over the REST API, sharing one HTTP client.
pub struct HttpSchedulingBackend {
    directory: DoctorDirectoryService,
    availability: AvailabilityService,
    patients: PatientDirectoryService,
    appointments: AppointmentService,
}

impl HttpSchedulingBackend {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let rest = Arc::new(RestClient::new(config)?);

        Ok(Self {
            directory: DoctorDirectoryService::new(Arc::clone(&rest), config),
            availability: AvailabilityService::new(Arc::clone(&rest), config),
            patients: PatientDirectoryService::new(Arc::clone(&rest), config),
            appointments: AppointmentService::new(rest, config),
        })
    }
}

#[async_trait]
impl SchedulingBackend for HttpSchedulingBackend {
    async fn active_doctors(&self) -> Result<Vec<Doctor>, AppError> {
        self.directory.list_active_doctors().await
    }

    async fn branch_roster(&self) -> Result<BranchRoster, AppError> {
        self.directory.list_branch_doctors().await
    }

    async fn patients(&self) -> Result<Vec<Patient>, AppError> {
        self.patients.list_patients().await
    }

    async fn unbooked_slots(&self, query: &SlotQuery) -> Result<Vec<TimeSlot>, AppError> {
        self.availability.get_unbooked_slots(query).await
    }

    async fn create_appointment(
        &self,
        role: CallerRole,
        request: &CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        self.appointments.create_appointment(role, request).await
    }
}

// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_http::RestClient;
use shared_models::CallerRole;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, CreateAppointmentRequest,
    CreateAppointmentResponse, StatusChangeRequest,
};
use crate::services::lifecycle::AppointmentLifecycleService;

pub struct AppointmentService {
    rest: Arc<RestClient>,
    client_appointments_path: String,
    staff_appointments_path: String,
    cancel_path: String,
    complete_path: String,
    lifecycle_service: AppointmentLifecycleService,
}

impl AppointmentService {
    pub fn new(rest: Arc<RestClient>, config: &AppConfig) -> Self {
        Self {
            rest,
            client_appointments_path: config.endpoints.client_appointments.clone(),
            staff_appointments_path: config.endpoints.staff_appointments.clone(),
            cancel_path: config.endpoints.cancel_appointment.clone(),
            complete_path: config.endpoints.complete_appointment.clone(),
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    /// Books the slot described by `request`. Slot conflicts are decided by the
    /// backend; a slot taken in the meantime comes back as an error.
    pub async fn create_appointment(
        &self,
        role: CallerRole,
        request: &CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!("Booking appointment with doctor {} on {} at {} ({})",
              request.doctor_id, request.appointment_date, request.from_time, role);

        let path = match role {
            CallerRole::Client => &self.client_appointments_path,
            CallerRole::Staff => {
                if request.client_id.is_none() {
                    return Err(AppointmentError::ValidationError(
                        "staff bookings must name a patient".to_string(),
                    ));
                }
                &self.staff_appointments_path
            }
        };

        let response: CreateAppointmentResponse = match self.rest.post(path, request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Appointment creation failed: {}", e);
                return Err(e.into());
            }
        };

        let appointment = response.into_appointment();
        info!("Appointment {} booked for {}", appointment.id, appointment.describe_when());

        Ok(appointment)
    }

    pub async fn cancel_appointment(&self, appointment: &Appointment) -> Result<(), AppointmentError> {
        self.change_status(appointment, AppointmentStatus::Cancelled, &self.cancel_path).await
    }

    pub async fn complete_appointment(&self, appointment: &Appointment) -> Result<(), AppointmentError> {
        self.change_status(appointment, AppointmentStatus::Completed, &self.complete_path).await
    }

    async fn change_status(
        &self,
        appointment: &Appointment,
        target: AppointmentStatus,
        path: &str,
    ) -> Result<(), AppointmentError> {
        self.lifecycle_service
            .validate_status_transition(appointment.status, target)?;

        debug!("Requesting {} for appointment {}", target, appointment.id);

        let _ack: Value = self.rest
            .put(path, &StatusChangeRequest { appointment_id: appointment.id.clone() })
            .await?;

        info!("Appointment {} is now {}", appointment.id, target);
        Ok(())
    }
}

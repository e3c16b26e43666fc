// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus};

/// Status transitions a client may request. Booking itself is the only way an
/// appointment comes into existence; everything after is cancel or complete.
#[derive(Debug, Default)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        Ok(())
    }

    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Pending | AppointmentStatus::Scheduled => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            // Terminal states
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
        }
    }

    pub fn is_terminal(&self, status: AppointmentStatus) -> bool {
        self.get_valid_transitions(status).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn open_appointments_can_be_cancelled_or_completed() {
        let lifecycle = AppointmentLifecycleService::new();
        for from in [AppointmentStatus::Pending, AppointmentStatus::Scheduled] {
            assert!(lifecycle.validate_status_transition(from, AppointmentStatus::Cancelled).is_ok());
            assert!(lifecycle.validate_status_transition(from, AppointmentStatus::Completed).is_ok());
        }
    }

    #[test]
    fn terminal_states_reject_everything() {
        let lifecycle = AppointmentLifecycleService::new();
        assert!(lifecycle.is_terminal(AppointmentStatus::Cancelled));
        assert_matches!(
            lifecycle.validate_status_transition(AppointmentStatus::Completed, AppointmentStatus::Cancelled),
            Err(AppointmentError::InvalidStatusTransition { .. })
        );
    }

    #[test]
    fn cannot_move_back_to_pending() {
        let lifecycle = AppointmentLifecycleService::new();
        assert!(lifecycle
            .validate_status_transition(AppointmentStatus::Scheduled, AppointmentStatus::Pending)
            .is_err());
    }
}

// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use shared_models::{Appointment, AppointmentStatus};

use crate::models::AppointmentError;

/// Admin decisions that produce a patient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Approved,
    Rejected,
    Deleted,
}

impl LifecycleEvent {
    /// Status the appointment ends in, `None` when the record is removed.
    pub fn target_status(&self) -> Option<AppointmentStatus> {
        match self {
            LifecycleEvent::Approved => Some(AppointmentStatus::Approved),
            LifecycleEvent::Rejected => Some(AppointmentStatus::Rejected),
            LifecycleEvent::Deleted => None,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            LifecycleEvent::Approved => "approved",
            LifecycleEvent::Rejected => "rejected",
            LifecycleEvent::Deleted => "deleted by the admin",
        }
    }
}

#[derive(Default)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
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

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Pending => vec![AppointmentStatus::Approved, AppointmentStatus::Rejected],
            // Terminal; only deletion remains
            AppointmentStatus::Approved | AppointmentStatus::Rejected => vec![],
        }
    }

    pub fn notification_message(&self, appointment: &Appointment, event: LifecycleEvent) -> String {
        format!(
            "Your appointment with {} at {} has been {}.",
            appointment.doctor,
            appointment.appointment_time,
            event.verb()
        )
    }
}

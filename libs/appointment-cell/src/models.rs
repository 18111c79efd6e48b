use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use doctor_cell::models::AvailabilityError;
use shared_database::StoreError;
use shared_models::error::AppError;
use shared_models::{Appointment, AppointmentStatus, Notification};

/// Age recorded when neither the request nor the session carries one.
pub const DEFAULT_PATIENT_AGE: i32 = 25;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_identity_number: String,
    pub date: NaiveDate,
    /// `HH:MM`, one of the slots offered for `date`.
    pub appointment_time: String,
    pub symptoms: String,
    /// Defaults to the session's display name.
    pub patient_name: Option<String>,
    pub age: Option<i32>,
}

/// Booking input after session defaults have been applied.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub doctor_identity_number: String,
    pub date: NaiveDate,
    pub appointment_time: String,
    pub symptoms: String,
    pub patient_name: String,
    pub patient_username: Option<String>,
    pub age: i32,
}

#[derive(Debug, Serialize)]
pub struct StatusChange {
    pub appointment: Appointment,
    pub notification: Notification,
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment {0} not found")]
    NotFound(Uuid),

    #[error("No doctor found with Identity Number '{0}'.")]
    DoctorNotFound(String),

    #[error("The {0} slot is not available. Please choose another time.")]
    SlotNotAvailable(String),

    #[error("Appointment is {from} and cannot be {to}.")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::NotFound(_) | AppointmentError::DoctorNotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            AppointmentError::SlotNotAvailable(_) | AppointmentError::InvalidStatusTransition { .. } => {
                AppError::Conflict(e.to_string())
            }
            AppointmentError::Validation(msg) => AppError::ValidationError(msg),
            AppointmentError::Availability(inner) => inner.into(),
            AppointmentError::Store(inner) => inner.into(),
        }
    }
}

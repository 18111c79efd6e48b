use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub doctor_identity_number: String,
    pub name: String,
    pub specialization: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub hospital_name: Option<String>,
    pub hospital_location: Option<String>,
    /// `HH:MM-HH:MM`; blank means the default window.
    pub availability: Option<String>,
    /// Full weekday names, e.g. `["Monday", "Thursday"]`.
    pub working_days: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub hospital_name: Option<String>,
    pub hospital_location: Option<String>,
    pub availability: Option<String>,
    pub working_days: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAvailabilityResponse {
    pub doctor_identity_number: String,
    pub doctor_name: String,
    pub specialization: String,
    pub date: NaiveDate,
    pub availability: String,
    pub working_days: Vec<String>,
    pub available_slots: Vec<String>,
    pub total_slots: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableDatesResponse {
    pub doctor_identity_number: String,
    pub working_days: Vec<String>,
    pub available_dates: Vec<NaiveDate>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Invalid availability format '{0}'. Please contact the administrator.")]
    MalformedAvailability(String),

    #[error("Invalid date selected ({0}). Please choose today or an upcoming working day.")]
    InvalidDate(NaiveDate),

    #[error("No available time slots for this doctor on the selected date.")]
    NoAvailability,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("No doctor found with Identity Number '{0}'.")]
    NotFound(String),

    #[error("A doctor with identity number '{0}' already exists.")]
    AlreadyExists(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AvailabilityError> for AppError {
    fn from(e: AvailabilityError) -> Self {
        match e {
            AvailabilityError::MalformedAvailability(_) => AppError::Configuration(e.to_string()),
            AvailabilityError::InvalidDate(_) => AppError::ValidationError(e.to_string()),
            AvailabilityError::NoAvailability => AppError::NotFound(e.to_string()),
        }
    }
}

impl From<DoctorError> for AppError {
    fn from(e: DoctorError) -> Self {
        match e {
            DoctorError::NotFound(_) => AppError::NotFound(e.to_string()),
            DoctorError::AlreadyExists(_) => AppError::Conflict(e.to_string()),
            DoctorError::Validation(msg) => AppError::ValidationError(msg),
            DoctorError::Availability(inner) => inner.into(),
            DoctorError::Store(inner) => inner.into(),
        }
    }
}

/// Parse admin-entered weekday names.
pub fn parse_working_days(names: &[String]) -> Result<Vec<Weekday>, DoctorError> {
    let mut days = Vec::with_capacity(names.len());
    for name in names {
        let day = name
            .trim()
            .parse::<Weekday>()
            .map_err(|_| DoctorError::Validation(format!("Unknown working day '{}'", name)))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

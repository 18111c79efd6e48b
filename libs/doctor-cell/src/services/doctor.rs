use std::sync::Arc;

use tracing::{debug, info};

use shared_database::{AppState, RecordStore, StoreError};
use shared_models::Doctor;

use crate::models::{parse_working_days, CreateDoctorRequest, DoctorError, UpdateDoctorRequest};
use crate::services::availability::AvailabilityWindow;

pub struct DoctorService {
    store: Arc<dyn RecordStore>,
}

fn required(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Blank availability clears the field; anything else must parse as a window.
fn normalize_availability(raw: Option<String>) -> Result<Option<String>, DoctorError> {
    match raw.map(|s| s.trim().to_string()) {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => {
            AvailabilityWindow::parse(&s)?;
            Ok(Some(s))
        }
        None => Ok(None),
    }
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        Ok(self.store.list_doctors().await?)
    }

    pub async fn get_doctor(&self, identity_number: &str) -> Result<Doctor, DoctorError> {
        let identity_number = identity_number.trim();
        if identity_number.is_empty() {
            return Err(DoctorError::Validation(
                "Please enter a valid Doctor Identity Number.".to_string(),
            ));
        }

        self.store
            .find_doctor(identity_number)
            .await?
            .ok_or_else(|| DoctorError::NotFound(identity_number.to_string()))
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Creating doctor {}", request.doctor_identity_number);

        if !required(&request.doctor_identity_number)
            || !required(&request.name)
            || !required(&request.specialization)
        {
            return Err(DoctorError::Validation("Please fill all required fields.".to_string()));
        }

        let doctor = Doctor {
            doctor_identity_number: request.doctor_identity_number.trim().to_string(),
            name: request.name.trim().to_string(),
            specialization: request.specialization.trim().to_string(),
            contact: request.contact.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            hospital_name: request.hospital_name.unwrap_or_default(),
            hospital_location: request.hospital_location.unwrap_or_default(),
            availability: normalize_availability(request.availability)?,
            working_days: request
                .working_days
                .as_deref()
                .map(parse_working_days)
                .transpose()?,
        };

        let identity_number = doctor.doctor_identity_number.clone();
        let created = self.store.insert_doctor(doctor).await.map_err(|e| match e {
            StoreError::Conflict(_) => DoctorError::AlreadyExists(identity_number.clone()),
            other => other.into(),
        })?;

        info!("Doctor {} added", created.doctor_identity_number);
        Ok(created)
    }

    pub async fn update_doctor(
        &self,
        identity_number: &str,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Updating doctor {}", identity_number);

        let mut doctor = self.get_doctor(identity_number).await?;

        if let Some(name) = request.name {
            if !required(&name) {
                return Err(DoctorError::Validation("Doctor name cannot be blank.".to_string()));
            }
            doctor.name = name.trim().to_string();
        }
        if let Some(specialization) = request.specialization {
            if !required(&specialization) {
                return Err(DoctorError::Validation("Specialization cannot be blank.".to_string()));
            }
            doctor.specialization = specialization.trim().to_string();
        }
        if let Some(contact) = request.contact {
            doctor.contact = contact;
        }
        if let Some(email) = request.email {
            doctor.email = email;
        }
        if let Some(hospital_name) = request.hospital_name {
            doctor.hospital_name = hospital_name;
        }
        if let Some(hospital_location) = request.hospital_location {
            doctor.hospital_location = hospital_location;
        }
        if request.availability.is_some() {
            doctor.availability = normalize_availability(request.availability)?;
        }
        if let Some(days) = request.working_days {
            doctor.working_days = Some(parse_working_days(&days)?).filter(|d| !d.is_empty());
        }

        let updated = self.store.replace_doctor(doctor).await.map_err(|e| match e {
            StoreError::NotFound(_) => DoctorError::NotFound(identity_number.to_string()),
            other => other.into(),
        })?;

        info!("Doctor {} updated", updated.doctor_identity_number);
        Ok(updated)
    }

    pub async fn delete_doctor(&self, identity_number: &str) -> Result<Doctor, DoctorError> {
        let identity_number = identity_number.trim();
        let deleted = self.store.delete_doctor(identity_number).await.map_err(|e| match e {
            StoreError::NotFound(_) => DoctorError::NotFound(identity_number.to_string()),
            other => other.into(),
        })?;

        info!("Doctor with Identity Number {} has been deleted", identity_number);
        Ok(deleted)
    }
}

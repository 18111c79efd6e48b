// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use doctor_cell::services::availability::compute_available_slots;
use shared_database::{AppState, RecordStore, StoreError};
use shared_models::{Appointment, AppointmentStatus, Notification};

use crate::models::{AppointmentError, NewAppointment, StatusChange};
use crate::services::lifecycle::{AppointmentLifecycleService, LifecycleEvent};

const MIN_AGE: i32 = 1;
const MAX_AGE: i32 = 120;

pub struct AppointmentBookingService {
    store: Arc<dyn RecordStore>,
    lifecycle_service: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(state.store.clone())
    }

    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    fn validate_request(request: &NewAppointment) -> Result<(), AppointmentError> {
        if request.patient_name.trim().is_empty() {
            return Err(AppointmentError::Validation("Patient name is required.".to_string()));
        }
        if request.symptoms.trim().is_empty() {
            return Err(AppointmentError::Validation(
                "Please describe your symptoms.".to_string(),
            ));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&request.age) {
            return Err(AppointmentError::Validation(format!(
                "Age must be between {} and {}.",
                MIN_AGE, MAX_AGE
            )));
        }
        Ok(())
    }

    /// Book a pending appointment in a slot currently offered for the doctor and date.
    pub async fn book_appointment(
        &self,
        request: NewAppointment,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking {} with doctor {} on {} at {}",
            request.patient_name, request.doctor_identity_number, request.date, request.appointment_time
        );

        Self::validate_request(&request)?;

        let doctor = self
            .store
            .find_doctor(request.doctor_identity_number.trim())
            .await?
            .ok_or_else(|| AppointmentError::DoctorNotFound(request.doctor_identity_number.clone()))?;

        let booked: Vec<String> = self
            .store
            .appointments_for_doctor_on(&doctor, request.date)
            .await?
            .into_iter()
            .map(|a| a.appointment_time)
            .collect();

        let offered = compute_available_slots(&doctor, request.date, today, &booked)?;
        if !offered.contains(&request.appointment_time) {
            warn!(
                "Slot {} with {} on {} is not offered",
                request.appointment_time, doctor.name, request.date
            );
            return Err(AppointmentError::SlotNotAvailable(request.appointment_time));
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_name: request.patient_name.trim().to_string(),
            patient_username: request.patient_username,
            age: request.age,
            symptoms: request.symptoms.trim().to_string(),
            doctor: doctor.name.clone(),
            doctor_identity_number: Some(doctor.doctor_identity_number.clone()),
            specialization: doctor.specialization.clone(),
            date: request.date,
            appointment_time: request.appointment_time.clone(),
            status: AppointmentStatus::Pending,
            created_at: Utc::now(),
        };

        // The store rejects the insert if another booking took the slot since the lookup.
        let created = self.store.insert_appointment(appointment).await.map_err(|e| match e {
            StoreError::Conflict(_) => AppointmentError::SlotNotAvailable(request.appointment_time),
            other => other.into(),
        })?;

        info!(
            "Appointment {} booked with {} on {} at {}",
            created.id, created.doctor, created.date, created.appointment_time
        );
        Ok(created)
    }

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.list_appointments().await?)
    }

    pub async fn appointments_for_patient(
        &self,
        patient_name: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.appointments_for_patient(patient_name).await?)
    }

    pub async fn approve(&self, id: Uuid) -> Result<StatusChange, AppointmentError> {
        self.transition(id, LifecycleEvent::Approved).await
    }

    pub async fn reject(&self, id: Uuid) -> Result<StatusChange, AppointmentError> {
        self.transition(id, LifecycleEvent::Rejected).await
    }

    /// Remove an appointment in any status and tell the patient.
    pub async fn delete(&self, id: Uuid) -> Result<StatusChange, AppointmentError> {
        let appointment = self.store.delete_appointment(id).await.map_err(|e| match e {
            StoreError::NotFound(_) => AppointmentError::NotFound(id),
            other => other.into(),
        })?;

        info!("Appointment {} deleted", id);
        let notification = self.notify(&appointment, LifecycleEvent::Deleted).await?;

        Ok(StatusChange {
            appointment,
            notification,
        })
    }

    async fn transition(&self, id: Uuid, event: LifecycleEvent) -> Result<StatusChange, AppointmentError> {
        let current = self
            .store
            .find_appointment(id)
            .await?
            .ok_or(AppointmentError::NotFound(id))?;

        let target = match event.target_status() {
            Some(status) => status,
            None => return self.delete(id).await,
        };

        self.lifecycle_service
            .validate_status_transition(current.status, target)?;

        let updated = match self.store.transition_appointment(id, current.status, target).await {
            Ok(updated) => updated,
            // Lost a race with another decision on the same appointment.
            Err(StoreError::Conflict(_)) => {
                let now = self
                    .store
                    .find_appointment(id)
                    .await?
                    .ok_or(AppointmentError::NotFound(id))?;
                return Err(AppointmentError::InvalidStatusTransition {
                    from: now.status,
                    to: target,
                });
            }
            Err(StoreError::NotFound(_)) => return Err(AppointmentError::NotFound(id)),
            Err(e) => return Err(e.into()),
        };

        info!("Appointment {} is now {}", id, updated.status);
        let notification = self.notify(&updated, event).await?;

        Ok(StatusChange {
            appointment: updated,
            notification,
        })
    }

    async fn notify(
        &self,
        appointment: &Appointment,
        event: LifecycleEvent,
    ) -> Result<Notification, AppointmentError> {
        let message = self.lifecycle_service.notification_message(appointment, event);
        // The appointment change is already committed at this point.
        let notification = self
            .store
            .insert_notification(Notification::new(appointment.patient_name.clone(), message))
            .await
            .map_err(|e| {
                error!(
                    "Appointment {} is {:?} but notifying {} failed: {}",
                    appointment.id, event, appointment.patient_name, e
                );
                e
            })?;

        debug!("Notified {} about appointment {}", notification.recipient, appointment.id);
        Ok(notification)
    }
}

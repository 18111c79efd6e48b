use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::{Account, Appointment, AppointmentStatus, Doctor, Notification, Role};

use crate::error::StoreError;
use crate::store::RecordStore;

#[derive(Default)]
struct Collections {
    users: Vec<Account>,
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
    notifications: Vec<Notification>,
}

/// Process-local store. Every conditional write runs under a single write lock,
/// so check-then-insert sequences are atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_account(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|a| a.username == username).cloned())
    }

    async fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|a| a.username == account.username) {
            return Err(StoreError::Conflict(format!("username '{}'", account.username)));
        }
        debug!("Inserting account {}", account.username);
        inner.users.push(account.clone());
        Ok(account)
    }

    async fn list_accounts(&self, role: Role) -> Result<Vec<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().filter(|a| a.role == role).cloned().collect())
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        Ok(self.inner.read().await.doctors.clone())
    }

    async fn find_doctor(&self, identity_number: &str) -> Result<Option<Doctor>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .doctors
            .iter()
            .find(|d| d.doctor_identity_number == identity_number)
            .cloned())
    }

    async fn insert_doctor(&self, doctor: Doctor) -> Result<Doctor, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .doctors
            .iter()
            .any(|d| d.doctor_identity_number == doctor.doctor_identity_number)
        {
            return Err(StoreError::Conflict(format!(
                "doctor identity number '{}'",
                doctor.doctor_identity_number
            )));
        }
        inner.doctors.push(doctor.clone());
        Ok(doctor)
    }

    async fn replace_doctor(&self, doctor: Doctor) -> Result<Doctor, StoreError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .doctors
            .iter_mut()
            .find(|d| d.doctor_identity_number == doctor.doctor_identity_number)
            .ok_or_else(|| StoreError::NotFound(format!("doctor '{}'", doctor.doctor_identity_number)))?;
        *slot = doctor.clone();
        Ok(doctor)
    }

    async fn delete_doctor(&self, identity_number: &str) -> Result<Doctor, StoreError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .doctors
            .iter()
            .position(|d| d.doctor_identity_number == identity_number)
            .ok_or_else(|| StoreError::NotFound(format!("doctor '{}'", identity_number)))?;
        Ok(inner.doctors.remove(index))
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.inner.read().await.appointments.clone())
    }

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn appointments_for_doctor_on(
        &self,
        doctor: &Doctor,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .appointments
            .iter()
            .filter(|a| a.date == date && a.is_with(Some(&doctor.doctor_identity_number), &doctor.name))
            .cloned()
            .collect())
    }

    async fn appointments_for_patient(&self, patient_name: &str) -> Result<Vec<Appointment>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .appointments
            .iter()
            .filter(|a| a.patient_name == patient_name)
            .cloned()
            .collect())
    }

    async fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.appointments.iter().any(|a| a.occupies(&appointment)) {
            return Err(StoreError::Conflict(format!(
                "{} is already booked with {} on {}",
                appointment.appointment_time, appointment.doctor, appointment.date
            )));
        }
        inner.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn transition_appointment(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.write().await;
        let appointment = inner
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("appointment '{}'", id)))?;

        if appointment.status != from {
            return Err(StoreError::Conflict(format!(
                "appointment '{}' is {}, expected {}",
                id, appointment.status, from
            )));
        }
        appointment.status = to;
        Ok(appointment.clone())
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("appointment '{}'", id)))?;
        Ok(inner.appointments.remove(index))
    }

    async fn insert_notification(&self, notification: Notification) -> Result<Notification, StoreError> {
        self.inner.write().await.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn notifications_for(&self, recipient: &str) -> Result<Vec<Notification>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .notifications
            .iter()
            .filter(|n| n.recipient == recipient)
            .cloned()
            .collect())
    }

    async fn clear_notifications(&self, recipient: &str) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.notifications.len();
        inner.notifications.retain(|n| n.recipient != recipient);
        Ok(before - inner.notifications.len())
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use shared_models::{Account, Appointment, AppointmentStatus, Doctor, Notification, Role};

use crate::error::StoreError;

/// Collections backing the scheduler: users, doctors, appointments, notifications.
///
/// Writes that guard an invariant are conditional inside the store itself:
/// `insert_account` and `insert_doctor` reject duplicate keys,
/// `insert_appointment` rejects a second booking of the same
/// (doctor identity number, date, appointment_time), and `transition_appointment` only applies
/// when the stored status still equals `from`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // users
    async fn find_account(&self, username: &str) -> Result<Option<Account>, StoreError>;
    async fn insert_account(&self, account: Account) -> Result<Account, StoreError>;
    async fn list_accounts(&self, role: Role) -> Result<Vec<Account>, StoreError>;

    // doctors
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError>;
    async fn find_doctor(&self, identity_number: &str) -> Result<Option<Doctor>, StoreError>;
    async fn insert_doctor(&self, doctor: Doctor) -> Result<Doctor, StoreError>;
    async fn replace_doctor(&self, doctor: Doctor) -> Result<Doctor, StoreError>;
    async fn delete_doctor(&self, identity_number: &str) -> Result<Doctor, StoreError>;

    // appointments
    async fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError>;
    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError>;
    /// Appointments held with `doctor` on `date`, matched through `Appointment::is_with`.
    async fn appointments_for_doctor_on(
        &self,
        doctor: &Doctor,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError>;
    async fn appointments_for_patient(&self, patient_name: &str) -> Result<Vec<Appointment>, StoreError>;
    async fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError>;
    async fn transition_appointment(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Appointment, StoreError>;
    async fn delete_appointment(&self, id: Uuid) -> Result<Appointment, StoreError>;

    // notifications
    async fn insert_notification(&self, notification: Notification) -> Result<Notification, StoreError>;
    async fn notifications_for(&self, recipient: &str) -> Result<Vec<Notification>, StoreError>;
    async fn clear_notifications(&self, recipient: &str) -> Result<usize, StoreError>;
}

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Approved => write!(f, "approved"),
            AppointmentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_name: String,
    #[serde(default)]
    pub patient_username: Option<String>,
    pub age: i32,
    pub symptoms: String,
    /// Doctor name at booking time, kept for display.
    pub doctor: String,
    /// Slot lookups key on this. Rows written without it match on `doctor`.
    #[serde(default)]
    pub doctor_identity_number: Option<String>,
    pub specialization: String,
    pub date: NaiveDate,
    pub appointment_time: String,
    #[serde(default, alias = "appointment_status")]
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Whether this appointment was booked with the given doctor.
    ///
    /// Identity numbers are compared when both sides carry one; the name is
    /// only consulted for rows that lack it.
    pub fn is_with(&self, identity_number: Option<&str>, name: &str) -> bool {
        match (self.doctor_identity_number.as_deref(), identity_number) {
            (Some(own), Some(other)) => own == other,
            _ => self.doctor == name,
        }
    }

    /// Whether `self` and `other` hold the same doctor, date and time.
    pub fn occupies(&self, other: &Appointment) -> bool {
        self.date == other.date
            && self.appointment_time == other.appointment_time
            && self.is_with(other.doctor_identity_number.as_deref(), &other.doctor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_status_decodes_as_pending() {
        let appointment: Appointment = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "patient_name": "Ravi",
            "age": 40,
            "symptoms": "cough",
            "doctor": "Dr. Lee",
            "specialization": "ENT",
            "date": "2026-11-02",
            "appointment_time": "09:30",
            "created_at": "2026-10-19T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(AppointmentStatus::default(), AppointmentStatus::Pending);
        assert!(appointment.is_with(Some("D100"), "Dr. Lee"));
        assert!(!appointment.is_with(Some("D100"), "Dr. Leela"));
    }

    fn booked(identity_number: Option<&str>, doctor: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_name: "Ravi".to_string(),
            patient_username: None,
            age: 40,
            symptoms: "cough".to_string(),
            doctor: doctor.to_string(),
            doctor_identity_number: identity_number.map(str::to_string),
            specialization: "ENT".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            appointment_time: "09:30".to_string(),
            status: AppointmentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn identity_number_decides_slot_ownership() {
        let original = booked(Some("D100"), "Dr. Lee");

        assert!(original.occupies(&booked(Some("D100"), "Dr. Lee Chen")));
        assert!(!original.occupies(&booked(Some("D200"), "Dr. Lee")));
        assert!(original.is_with(Some("D100"), "Dr. Lee Chen"));
    }

    #[test]
    fn rows_without_identity_number_match_on_name() {
        let legacy = booked(None, "Dr. Lee");

        assert!(legacy.occupies(&booked(Some("D100"), "Dr. Lee")));
        assert!(!legacy.occupies(&booked(Some("D100"), "Dr. Lee Chen")));
        assert!(booked(Some("D100"), "Dr. Lee").occupies(&legacy));
    }
}

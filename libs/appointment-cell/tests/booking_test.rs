use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Datelike, Days, NaiveDate, Weekday};

use appointment_cell::models::{AppointmentError, NewAppointment};
use appointment_cell::services::AppointmentBookingService;
use doctor_cell::models::AvailabilityError;
use doctor_cell::services::availability::today;
use shared_database::{MemoryStore, RecordStore};
use shared_models::{AppointmentStatus, Doctor};

fn next(weekday: Weekday) -> NaiveDate {
    let start = today();
    (0..7)
        .map(|offset| start + Days::new(offset))
        .find(|date| date.weekday() == weekday)
        .unwrap()
}

fn cardiologist() -> Doctor {
    Doctor {
        doctor_identity_number: "D100".to_string(),
        name: "Dr. Asha Rao".to_string(),
        specialization: "Cardiology".to_string(),
        contact: "555-0100".to_string(),
        email: "asha@example.com".to_string(),
        hospital_name: "City General".to_string(),
        hospital_location: "Bengaluru".to_string(),
        availability: Some("09:00-11:00".to_string()),
        working_days: Some(vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]),
    }
}

fn booking(patient: &str, date: NaiveDate, time: &str) -> NewAppointment {
    NewAppointment {
        doctor_identity_number: "D100".to_string(),
        date,
        appointment_time: time.to_string(),
        symptoms: "chest tightness".to_string(),
        patient_name: patient.to_string(),
        patient_username: Some(patient.to_lowercase()),
        age: 42,
    }
}

async fn setup() -> (Arc<MemoryStore>, AppointmentBookingService) {
    let store = Arc::new(MemoryStore::new());
    store.insert_doctor(cardiologist()).await.unwrap();
    (store.clone(), AppointmentBookingService::with_store(store))
}

#[tokio::test]
async fn booking_records_a_pending_appointment() {
    let (store, service) = setup().await;
    let monday = next(Weekday::Mon);

    let appointment = service
        .book_appointment(booking("Meera", monday, "09:30"), today())
        .await
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.doctor, "Dr. Asha Rao");
    assert_eq!(appointment.specialization, "Cardiology");
    assert_eq!(appointment.doctor_identity_number.as_deref(), Some("D100"));
    assert_eq!(store.list_appointments().await.unwrap().len(), 1);
    assert!(store.notifications_for("Meera").await.unwrap().is_empty());
}

#[tokio::test]
async fn second_booking_of_a_taken_slot_fails() {
    let (store, service) = setup().await;
    let monday = next(Weekday::Mon);

    service
        .book_appointment(booking("Meera", monday, "10:00"), today())
        .await
        .unwrap();
    let second = service
        .book_appointment(booking("Arjun", monday, "10:00"), today())
        .await;

    assert_matches!(second, Err(AppointmentError::SlotNotAvailable(time)) if time == "10:00");
    assert_eq!(store.list_appointments().await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_bookings_of_one_slot_yield_one_appointment() {
    let (store, _) = setup().await;
    let monday = next(Weekday::Mon);

    let handles: Vec<_> = ["Meera", "Arjun", "Kavya", "Rohan"]
        .into_iter()
        .map(|patient| {
            let service = AppointmentBookingService::with_store(store.clone());
            tokio::spawn(async move {
                service
                    .book_appointment(booking(patient, monday, "09:00"), today())
                    .await
            })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) => assert_matches!(e, AppointmentError::SlotNotAvailable(_)),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(
        store.appointments_for_doctor_on(&cardiologist(), monday).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn renaming_the_doctor_keeps_booked_slots_taken() {
    let (store, service) = setup().await;
    let monday = next(Weekday::Mon);

    service
        .book_appointment(booking("Meera", monday, "10:00"), today())
        .await
        .unwrap();

    let mut renamed = cardiologist();
    renamed.name = "Dr. Asha Rao-Menon".to_string();
    store.replace_doctor(renamed.clone()).await.unwrap();

    let again = service
        .book_appointment(booking("Arjun", monday, "10:00"), today())
        .await;
    assert_matches!(again, Err(AppointmentError::SlotNotAvailable(time)) if time == "10:00");

    let held = store.appointments_for_doctor_on(&renamed, monday).await.unwrap();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].patient_name, "Meera");
}

#[tokio::test]
async fn doctors_sharing_a_name_keep_separate_slots() {
    let (store, service) = setup().await;
    let monday = next(Weekday::Mon);

    let mut namesake = cardiologist();
    namesake.doctor_identity_number = "D200".to_string();
    store.insert_doctor(namesake).await.unwrap();

    service
        .book_appointment(booking("Meera", monday, "10:00"), today())
        .await
        .unwrap();

    let mut with_namesake = booking("Arjun", monday, "10:00");
    with_namesake.doctor_identity_number = "D200".to_string();
    let second = service.book_appointment(with_namesake, today()).await.unwrap();

    assert_eq!(second.doctor_identity_number.as_deref(), Some("D200"));
    assert_eq!(store.list_appointments().await.unwrap().len(), 2);
}

#[tokio::test]
async fn off_grid_and_non_working_day_bookings_are_refused() {
    let (_, service) = setup().await;

    assert_matches!(
        service
            .book_appointment(booking("Meera", next(Weekday::Mon), "09:15"), today())
            .await,
        Err(AppointmentError::SlotNotAvailable(_))
    );
    assert_matches!(
        service
            .book_appointment(booking("Meera", next(Weekday::Tue), "09:00"), today())
            .await,
        Err(AppointmentError::Availability(AvailabilityError::InvalidDate(_)))
    );
}

#[tokio::test]
async fn blank_symptoms_and_unknown_doctor_are_refused() {
    let (store, service) = setup().await;
    let monday = next(Weekday::Mon);

    let mut blank = booking("Meera", monday, "09:00");
    blank.symptoms = "  ".to_string();
    assert_matches!(
        service.book_appointment(blank, today()).await,
        Err(AppointmentError::Validation(_))
    );

    let mut unknown = booking("Meera", monday, "09:00");
    unknown.doctor_identity_number = "D999".to_string();
    assert_matches!(
        service.book_appointment(unknown, today()).await,
        Err(AppointmentError::DoctorNotFound(id)) if id == "D999"
    );

    assert!(store.list_appointments().await.unwrap().is_empty());
}

#[tokio::test]
async fn approval_notifies_once_and_is_final() {
    let (store, service) = setup().await;
    let appointment = service
        .book_appointment(booking("Meera", next(Weekday::Wed), "10:30"), today())
        .await
        .unwrap();

    let change = service.approve(appointment.id).await.unwrap();
    assert_eq!(change.appointment.status, AppointmentStatus::Approved);
    assert_eq!(
        change.notification.message,
        "Your appointment with Dr. Asha Rao at 10:30 has been approved."
    );

    assert_matches!(
        service.approve(appointment.id).await,
        Err(AppointmentError::InvalidStatusTransition {
            from: AppointmentStatus::Approved,
            to: AppointmentStatus::Approved
        })
    );
    assert_matches!(
        service.reject(appointment.id).await,
        Err(AppointmentError::InvalidStatusTransition { .. })
    );

    let notifications = store.notifications_for("Meera").await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        store.find_appointment(appointment.id).await.unwrap().unwrap().status,
        AppointmentStatus::Approved
    );
}

#[tokio::test]
async fn rejected_appointment_keeps_its_slot() {
    let (_, service) = setup().await;
    let friday = next(Weekday::Fri);
    let appointment = service
        .book_appointment(booking("Meera", friday, "09:00"), today())
        .await
        .unwrap();

    let change = service.reject(appointment.id).await.unwrap();
    assert_eq!(
        change.notification.message,
        "Your appointment with Dr. Asha Rao at 09:00 has been rejected."
    );

    assert_matches!(
        service
            .book_appointment(booking("Arjun", friday, "09:00"), today())
            .await,
        Err(AppointmentError::SlotNotAvailable(_))
    );
}

#[tokio::test]
async fn deletion_notifies_and_frees_the_slot() {
    let (store, service) = setup().await;
    let monday = next(Weekday::Mon);
    let appointment = service
        .book_appointment(booking("Meera", monday, "11:00"), today())
        .await
        .unwrap();
    service.approve(appointment.id).await.unwrap();

    let change = service.delete(appointment.id).await.unwrap();
    assert_eq!(
        change.notification.message,
        "Your appointment with Dr. Asha Rao at 11:00 has been deleted by the admin."
    );
    assert!(store.find_appointment(appointment.id).await.unwrap().is_none());
    assert_eq!(store.notifications_for("Meera").await.unwrap().len(), 2);

    assert!(service
        .book_appointment(booking("Arjun", monday, "11:00"), today())
        .await
        .is_ok());
}

#[tokio::test]
async fn unknown_appointment_is_not_found_and_silent() {
    let (store, service) = setup().await;
    let id = uuid::Uuid::new_v4();

    assert_matches!(service.approve(id).await, Err(AppointmentError::NotFound(found)) if found == id);
    assert_matches!(service.delete(id).await, Err(AppointmentError::NotFound(_)));
    assert!(store.notifications_for("Meera").await.unwrap().is_empty());
}

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::{AvailabilityError, DoctorError};
use doctor_cell::services::availability::today;
use doctor_cell::services::AvailabilityService;
use shared_database::SupabaseStore;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn next_monday() -> NaiveDate {
    let start = today();
    (0..7)
        .map(|offset| start + Days::new(offset))
        .find(|date| date.weekday() == Weekday::Mon)
        .unwrap()
}

async fn service_for(server: &MockServer) -> AvailabilityService {
    let config = TestConfig::with_supabase(&server.uri());
    let store = Arc::new(SupabaseStore::new(&config.to_app_config()));
    AvailabilityService::new(&config.to_state_with(store))
}

async fn mount_doctor(server: &MockServer, row: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("doctor_identity_number", "eq.D100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn slots_skip_times_booked_in_the_database() {
    let server = MockServer::start().await;
    let monday = next_monday();
    let date = monday.format("%Y-%m-%d").to_string();

    mount_doctor(
        &server,
        MockSupabaseResponses::doctor_row("D100", "Dr. Asha Rao", "Cardiology"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("date", format!("eq.{}", date)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row("D100", "Dr. Asha Rao", &date, "09:00"),
            MockSupabaseResponses::appointment_row("D100", "Dr. Asha Rao (Cardiology)", &date, "16:30"),
            MockSupabaseResponses::appointment_row("D200", "Dr. Asha Rao", &date, "12:00"),
        ])))
        .mount(&server)
        .await;

    let response = service_for(&server)
        .await
        .available_slots("D100", monday, today())
        .await
        .unwrap();

    assert_eq!(response.total_slots, 15);
    assert_eq!(response.available_slots.first().map(String::as_str), Some("09:30"));
    assert!(response.available_slots.contains(&"12:00".to_string()));
    assert!(!response.available_slots.contains(&"16:30".to_string()));
    assert_eq!(response.available_slots.last().map(String::as_str), Some("17:00"));
}

#[tokio::test]
async fn every_slot_taken_is_no_availability() {
    let server = MockServer::start().await;
    let monday = next_monday();
    let date = monday.format("%Y-%m-%d").to_string();

    let mut row = MockSupabaseResponses::doctor_row("D100", "Dr. Asha Rao", "Cardiology");
    row["availability"] = json!("09:00-09:30");
    mount_doctor(&server, row).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row("D100", "Dr. Asha Rao", &date, "09:00"),
            MockSupabaseResponses::appointment_row("D100", "Dr. Asha Rao", &date, "09:30"),
        ])))
        .mount(&server)
        .await;

    let result = service_for(&server)
        .await
        .available_slots("D100", monday, today())
        .await;

    assert_matches!(
        result,
        Err(DoctorError::Availability(AvailabilityError::NoAvailability))
    );
}

#[tokio::test]
async fn stored_malformed_availability_surfaces_as_configuration_error() {
    let server = MockServer::start().await;

    let mut row = MockSupabaseResponses::doctor_row("D100", "Dr. Asha Rao", "Cardiology");
    row["availability"] = json!("mornings");
    mount_doctor(&server, row).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = service_for(&server)
        .await
        .available_slots("D100", next_monday(), today())
        .await;

    assert_matches!(
        result,
        Err(DoctorError::Availability(AvailabilityError::MalformedAvailability(raw))) if raw == "mornings"
    );
}

#[tokio::test]
async fn unknown_doctor_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = service_for(&server)
        .await
        .available_dates("D999", today())
        .await;

    assert_matches!(result, Err(DoctorError::NotFound(id)) if id == "D999");
}

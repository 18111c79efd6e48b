// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use doctor_cell::services::availability::today;
use shared_database::AppState;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::require_role;

use crate::models::{BookAppointmentRequest, NewAppointment, StatusChange, DEFAULT_PATIENT_AGE};
use crate::services::AppointmentBookingService;

fn status_change_response(change: StatusChange) -> Json<Value> {
    Json(json!({
        "success": true,
        "appointment": change.appointment,
        "message": change.notification.message
    }))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Patient)?;

    let booking = NewAppointment {
        doctor_identity_number: request.doctor_identity_number,
        date: request.date,
        appointment_time: request.appointment_time,
        symptoms: request.symptoms,
        patient_name: request.patient_name.unwrap_or_else(|| user.name.clone()),
        patient_username: Some(user.username.clone()),
        age: request.age.or(user.age).unwrap_or(DEFAULT_PATIENT_AGE),
    };

    let appointment = AppointmentBookingService::new(&state)
        .book_appointment(booking, today())
        .await?;

    let message = format!(
        "Appointment booked successfully with {} on {} at {}!",
        appointment.doctor, appointment.date, appointment.appointment_time
    );

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": message
    })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Admin)?;

    let appointments = AppointmentBookingService::new(&state).list_appointments().await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn my_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Patient)?;

    let appointments = AppointmentBookingService::new(&state)
        .appointments_for_patient(&user.name)
        .await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn approve_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Admin)?;

    let change = AppointmentBookingService::new(&state).approve(appointment_id).await?;
    Ok(status_change_response(change))
}

#[axum::debug_handler]
pub async fn reject_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Admin)?;

    let change = AppointmentBookingService::new(&state).reject(appointment_id).await?;
    Ok(status_change_response(change))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Admin)?;

    let change = AppointmentBookingService::new(&state).delete(appointment_id).await?;
    Ok(status_change_response(change))
}

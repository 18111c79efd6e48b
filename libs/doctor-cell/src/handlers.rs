use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::require_role;

use crate::models::{AvailableSlotsQuery, CreateDoctorRequest, UpdateDoctorRequest};
use crate::services::availability::today;
use crate::services::{AvailabilityService, DoctorService};

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctors = DoctorService::new(&state).list_doctors().await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<User>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(&state).get_doctor(&doctor_id).await?;

    Ok(Json(json!({
        "doctor": doctor,
        "availability": doctor.availability_or_default(),
        "working_days": doctor.working_day_names()
    })))
}

#[axum::debug_handler]
pub async fn get_available_dates(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<User>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let dates = AvailabilityService::new(&state)
        .available_dates(&doctor_id, today())
        .await?;

    Ok(Json(json!(dates)))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<User>,
    Path(doctor_id): Path<String>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let slots = AvailabilityService::new(&state)
        .available_slots(&doctor_id, query.date, today())
        .await?;

    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Admin)?;

    let doctor = DoctorService::new(&state).create_doctor(request).await?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": format!("Doctor {} added successfully.", doctor.name)
    })))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<String>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Admin)?;

    let doctor = DoctorService::new(&state).update_doctor(&doctor_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor
    })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Admin)?;

    let deleted = DoctorService::new(&state).delete_doctor(&doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!(
            "Doctor with Identity Number {} has been deleted.",
            deleted.doctor_identity_number
        )
    })))
}

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Patient
        .route("/", post(handlers::book_appointment).get(handlers::list_appointments))
        .route("/mine", get(handlers::my_appointments))
        // Admin review
        .route("/{appointment_id}/approve", patch(handlers::approve_appointment))
        .route("/{appointment_id}/reject", patch(handlers::reject_appointment))
        .route("/{appointment_id}", delete(handlers::delete_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::typed_header::TypedHeaderRejection;
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::debug;

use shared_database::AppState;
use shared_models::auth::{Role, TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::jwt::{issue_token, validate_token};

use crate::models::{AuthError, LoginRequest, LoginResponse, RegisterRequest, SessionProfile};
use crate::services::AuthService;

type BearerHeader = Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>;

fn bearer_token(header: BearerHeader) -> Result<String, AppError> {
    header
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
        .map_err(|_| AppError::Auth("Missing authorization header".to_string()))
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    let account = AuthService::new(&state).register_user(request).await?;

    Ok(Json(json!({
        "success": true,
        "username": account.username,
        "message": "Registration successful! Please log in."
    })))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let role = request.role.unwrap_or(Role::Patient);
    let user = AuthService::new(&state)
        .authenticate_user(&request.username, &request.password, role)
        .await?;

    let ttl_hours = state.config.session_ttl_hours;
    let token = issue_token(&user, &state.config.session_jwt_secret, ttl_hours)
        .map_err(AuthError::Token)?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in_hours: ttl_hours,
        user: SessionProfile {
            username: user.username,
            name: user.name,
            role: user.role,
            age: user.age,
        },
    }))
}

#[axum::debug_handler]
pub async fn me(Extension(user): Extension<User>) -> Json<SessionProfile> {
    Json(SessionProfile {
        username: user.username,
        name: user.name,
        role: user.role,
        age: user.age,
    })
}

#[axum::debug_handler]
pub async fn validate_session(
    State(state): State<Arc<AppState>>,
    header: BearerHeader,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = bearer_token(header)?;
    let user = validate_token(&token, &state.config.session_jwt_secret).map_err(AppError::Auth)?;

    Ok(Json(TokenResponse {
        valid: true,
        username: user.username,
        name: user.name,
        role: user.role,
    }))
}

#[axum::debug_handler]
pub async fn verify_session(
    State(state): State<Arc<AppState>>,
    header: BearerHeader,
) -> Result<Json<Value>, AppError> {
    debug!("Verifying token");

    let token = bearer_token(header)?;
    let valid = validate_token(&token, &state.config.session_jwt_secret).is_ok();

    Ok(Json(json!({ "valid": valid })))
}

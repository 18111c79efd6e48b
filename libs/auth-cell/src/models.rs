use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::auth::Role;
use shared_models::error::AppError;

pub const MIN_AGE: i32 = 1;
pub const MAX_AGE: i32 = 120;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Role the caller is signing in as; patients when omitted.
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionProfile {
    pub username: String,
    pub name: String,
    pub role: Role,
    pub age: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in_hours: i64,
    pub user: SessionProfile,
}

#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown user, wrong password and wrong role all collapse here.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("{0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Session token could not be issued: {0}")]
    Token(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Auth(e.to_string()),
            AuthError::UsernameTaken => AppError::Conflict(e.to_string()),
            AuthError::Validation(msg) => AppError::ValidationError(msg),
            AuthError::Hashing(_) | AuthError::Token(_) => AppError::Internal(e.to_string()),
            AuthError::Store(inner) => inner.into(),
        }
    }
}

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use shared_database::{AppState, RecordStore, StoreError};
use shared_models::auth::{Role, User};
use shared_models::Account;

use crate::models::{AuthError, RegisterRequest, MAX_AGE, MIN_AGE};
use crate::services::password::PasswordService;

pub const ADMIN_DISPLAY_NAME: &str = "Admin User";

pub struct AuthService {
    store: Arc<dyn RecordStore>,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(state.store.clone())
    }

    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a patient account. The username must be unused across every role.
    pub async fn register_user(&self, request: RegisterRequest) -> Result<Account, AuthError> {
        debug!("Registering user {}", request.username);

        if blank(&request.name) || blank(&request.username) || blank(&request.password) {
            return Err(AuthError::Validation("Please fill all required fields.".to_string()));
        }

        let age = request
            .age
            .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
            .ok_or_else(|| {
                AuthError::Validation(format!("Age must be between {} and {}.", MIN_AGE, MAX_AGE))
            })?;

        let username = request.username.trim().to_string();
        if self.store.find_account(&username).await?.is_some() {
            warn!("Registration rejected, username {} is taken", username);
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = PasswordService::hash_password(&request.password)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let account = Account {
            username,
            password_hash,
            role: Role::Patient,
            name: request.name.trim().to_string(),
            age: Some(age),
            phone: non_blank(request.phone),
            email: non_blank(request.email),
            created_at: Utc::now(),
        };

        let created = self.store.insert_account(account).await.map_err(|e| match e {
            StoreError::Conflict(_) => AuthError::UsernameTaken,
            other => other.into(),
        })?;

        info!("Registered patient {}", created.username);
        Ok(created)
    }

    /// Resolve a login to its session user. Every failure is `InvalidCredentials`.
    pub async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        debug!("Authenticating {} as {}", username, role);

        let account = match self
            .store
            .find_account(username.trim())
            .await?
            .filter(|account| account.role == role)
        {
            Some(account) => account,
            None => {
                // Same argon2 cost as a wrong password.
                PasswordService::verify_decoy(password);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let verified = PasswordService::verify_password(password, &account.password_hash)
            .unwrap_or_else(|e| {
                warn!("Stored password hash for {} is unreadable: {}", account.username, e);
                false
            });

        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        info!("User {} signed in as {}", account.username, role);
        Ok(User {
            username: account.username,
            name: account.name,
            role: account.role,
            age: account.age,
            issued_at: None,
        })
    }

    /// Insert the admin account when missing. Returns whether it was created.
    pub async fn seed_admin(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        if self.store.find_account(username).await?.is_some() {
            debug!("Admin account {} already present", username);
            return Ok(false);
        }

        let password_hash = PasswordService::hash_password(password)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let account = Account {
            username: username.to_string(),
            password_hash,
            role: Role::Admin,
            name: ADMIN_DISPLAY_NAME.to_string(),
            age: None,
            phone: None,
            email: None,
            created_at: Utc::now(),
        };

        match self.store.insert_account(account).await {
            Ok(_) => {
                info!("Seeded admin account {}", username);
                Ok(true)
            }
            Err(StoreError::Conflict(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_models::Account;

/// What an admin sees about a registered patient. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub username: String,
    pub name: String,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl From<Account> for PatientSummary {
    fn from(account: Account) -> Self {
        Self {
            username: account.username,
            name: account.name,
            age: account.age,
            phone: account.phone,
            email: account.email,
            registered_at: account.created_at,
        }
    }
}

#[derive(Error, Debug)]
pub enum PatientError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PatientError> for AppError {
    fn from(e: PatientError) -> Self {
        match e {
            PatientError::Store(inner) => inner.into(),
        }
    }
}

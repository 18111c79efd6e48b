use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::{AppConfig, StoreBackend};
use shared_database::{AppState, RecordStore};
use shared_models::auth::{Role, User};

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    /// Config pointed at a mock PostgREST server.
    pub fn with_supabase(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            bind_address: "127.0.0.1:0".to_string(),
            session_jwt_secret: self.jwt_secret.clone(),
            session_ttl_hours: 1,
            store_backend: StoreBackend::Memory,
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            doctor_seed_path: None,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
        }
    }

    /// Fresh state over an empty in-memory store.
    pub fn to_state(&self) -> AppState {
        AppState::in_memory(self.to_app_config())
    }

    pub fn to_state_with(&self, store: Arc<dyn RecordStore>) -> AppState {
        AppState::new(self.to_app_config(), store)
    }
}

pub struct TestUser {
    pub username: String,
    pub name: String,
    pub role: Role,
    pub age: Option<i32>,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::patient("test-patient")
    }
}

impl TestUser {
    pub fn new(username: &str, name: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            name: name.to_string(),
            role,
            age: None,
        }
    }

    pub fn patient(username: &str) -> Self {
        Self {
            age: Some(30),
            ..Self::new(username, &format!("Patient {}", username), Role::Patient)
        }
    }

    pub fn admin(username: &str) -> Self {
        Self::new(username, "Admin User", Role::Admin)
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn to_user(&self) -> User {
        User {
            username: self.username.clone(),
            name: self.name.clone(),
            role: self.role,
            age: self.age,
            issued_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.username,
            "name": user.name,
            "role": user.role,
            "age": user.age,
            "iat": now.timestamp(),
            "exp": exp.timestamp().max(0)
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    pub fn bearer(user: &TestUser, config: &TestConfig) -> String {
        format!("Bearer {}", Self::create_test_token(user, &config.jwt_secret, Some(1)))
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn doctor_row(identity_number: &str, name: &str, specialization: &str) -> serde_json::Value {
        json!({
            "doctor_identity_number": identity_number,
            "name": name,
            "specialization": specialization,
            "contact": "555-0100",
            "email": "doctor@example.com",
            "hospital_name": "City General Hospital",
            "hospital_location": "Bengaluru",
            "availability": "09:00-17:00",
            "working_days": ["Monday", "Wednesday", "Friday"]
        })
    }

    pub fn account_row(username: &str, name: &str, role: &str) -> serde_json::Value {
        json!({
            "username": username,
            "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g",
            "role": role,
            "name": name,
            "age": 30,
            "phone": "555-0199",
            "email": format!("{}@example.com", username),
            "created_at": "2026-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(identity_number: &str, doctor: &str, date: &str, time: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "patient_name": "Test Patient",
            "patient_username": "test-patient",
            "age": 30,
            "symptoms": "fever",
            "doctor": doctor,
            "doctor_identity_number": identity_number,
            "specialization": "General Practice",
            "date": date,
            "appointment_time": time,
            "status": "pending",
            "created_at": "2026-01-01T00:00:00Z"
        })
    }
}

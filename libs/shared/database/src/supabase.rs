use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};
use urlencoding::encode;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{Account, Appointment, AppointmentStatus, Doctor, Notification, Role};

use crate::error::StoreError;
use crate::store::RecordStore;

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&self.service_key)
            .map_err(|_| StoreError::Backend("Supabase service key is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key))
            .map_err(|_| StoreError::Backend("Supabase service key is not a valid header value".to_string()))?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            error!("API error ({}): {}", status, text);

            return Err(match status {
                StatusCode::CONFLICT => StoreError::Conflict(text),
                StatusCode::NOT_FOUND => StoreError::NotFound(text),
                _ => StoreError::Backend(format!("API error ({}): {}", status, text)),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Request that asks PostgREST to echo the affected rows back.
    async fn request_representation<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        self.request_with_headers(method, path, body, Some(headers)).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

/// `RecordStore` over Supabase's PostgREST API.
///
/// Expects a unique index on `users(username)`, `doctors(doctor_identity_number)`
/// and `appointments(doctor, date, appointment_time)`; PostgREST reports
/// violations as 409, which surface as `StoreError::Conflict`.
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn select<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, StoreError> {
        self.supabase.request(Method::GET, path, None).await
    }

    async fn insert<T: DeserializeOwned>(&self, table: &str, row: Value) -> Result<T, StoreError> {
        let path = format!("/rest/v1/{}", table);
        let mut rows: Vec<T> = self
            .supabase
            .request_representation(Method::POST, &path, Some(row))
            .await?;
        rows.pop()
            .ok_or_else(|| StoreError::Backend(format!("insert into {} returned no rows", table)))
    }

    async fn first<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, StoreError> {
        Ok(self.select::<T>(path).await?.into_iter().next())
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn find_account(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.first(&format!("/rest/v1/users?username=eq.{}&limit=1", encode(username)))
            .await
    }

    async fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        self.insert("users", serde_json::to_value(&account)?).await
    }

    async fn list_accounts(&self, role: Role) -> Result<Vec<Account>, StoreError> {
        self.select(&format!("/rest/v1/users?role=eq.{}&order=created_at.asc", role))
            .await
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        self.select("/rest/v1/doctors").await
    }

    async fn find_doctor(&self, identity_number: &str) -> Result<Option<Doctor>, StoreError> {
        self.first(&format!(
            "/rest/v1/doctors?doctor_identity_number=eq.{}&limit=1",
            encode(identity_number)
        ))
        .await
    }

    async fn insert_doctor(&self, doctor: Doctor) -> Result<Doctor, StoreError> {
        self.insert("doctors", serde_json::to_value(&doctor)?).await
    }

    async fn replace_doctor(&self, doctor: Doctor) -> Result<Doctor, StoreError> {
        let path = format!(
            "/rest/v1/doctors?doctor_identity_number=eq.{}",
            encode(&doctor.doctor_identity_number)
        );
        let mut row = serde_json::to_value(&doctor)?;
        // PATCH leaves omitted columns untouched, so cleared optionals are sent as null.
        if let Some(fields) = row.as_object_mut() {
            fields.entry("availability").or_insert(Value::Null);
            fields.entry("working_days").or_insert(Value::Null);
        }

        let mut rows: Vec<Doctor> = self
            .supabase
            .request_representation(Method::PATCH, &path, Some(row))
            .await?;
        rows.pop()
            .ok_or_else(|| StoreError::NotFound(format!("doctor '{}'", doctor.doctor_identity_number)))
    }

    async fn delete_doctor(&self, identity_number: &str) -> Result<Doctor, StoreError> {
        let path = format!("/rest/v1/doctors?doctor_identity_number=eq.{}", encode(identity_number));
        let mut rows: Vec<Doctor> = self
            .supabase
            .request_representation(Method::DELETE, &path, None)
            .await?;
        rows.pop()
            .ok_or_else(|| StoreError::NotFound(format!("doctor '{}'", identity_number)))
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        self.select("/rest/v1/appointments?order=created_at.asc").await
    }

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        self.first(&format!("/rest/v1/appointments?id=eq.{}&limit=1", id)).await
    }

    async fn appointments_for_doctor_on(
        &self,
        doctor: &Doctor,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError> {
        let day: Vec<Appointment> = self
            .select(&format!("/rest/v1/appointments?date=eq.{}", date.format("%Y-%m-%d")))
            .await?;

        Ok(day
            .into_iter()
            .filter(|a| a.is_with(Some(&doctor.doctor_identity_number), &doctor.name))
            .collect())
    }

    async fn appointments_for_patient(&self, patient_name: &str) -> Result<Vec<Appointment>, StoreError> {
        self.select(&format!(
            "/rest/v1/appointments?patient_name=eq.{}&order=created_at.asc",
            encode(patient_name)
        ))
        .await
    }

    async fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        self.insert("appointments", serde_json::to_value(&appointment)?).await
    }

    async fn transition_appointment(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        let path = format!("/rest/v1/appointments?id=eq.{}&status=eq.{}", id, from);
        let mut rows: Vec<Appointment> = self
            .supabase
            .request_representation(Method::PATCH, &path, Some(json!({ "status": to })))
            .await?;

        if let Some(updated) = rows.pop() {
            return Ok(updated);
        }

        // Nothing matched: either the row is gone or its status moved on.
        match self.find_appointment(id).await? {
            Some(current) => Err(StoreError::Conflict(format!(
                "appointment '{}' is {}, expected {}",
                id, current.status, from
            ))),
            None => Err(StoreError::NotFound(format!("appointment '{}'", id))),
        }
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<Appointment, StoreError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let mut rows: Vec<Appointment> = self
            .supabase
            .request_representation(Method::DELETE, &path, None)
            .await?;
        rows.pop()
            .ok_or_else(|| StoreError::NotFound(format!("appointment '{}'", id)))
    }

    async fn insert_notification(&self, notification: Notification) -> Result<Notification, StoreError> {
        self.insert("notifications", serde_json::to_value(&notification)?).await
    }

    async fn notifications_for(&self, recipient: &str) -> Result<Vec<Notification>, StoreError> {
        self.select(&format!(
            "/rest/v1/notifications?recipient=eq.{}&order=created_at.asc",
            encode(recipient)
        ))
        .await
    }

    async fn clear_notifications(&self, recipient: &str) -> Result<usize, StoreError> {
        let path = format!("/rest/v1/notifications?recipient=eq.{}", encode(recipient));
        let removed: Vec<Value> = self
            .supabase
            .request_representation(Method::DELETE, &path, None)
            .await?;
        Ok(removed.len())
    }
}

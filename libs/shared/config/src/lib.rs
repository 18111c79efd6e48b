use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Which record store backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Supabase,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            "supabase" => Ok(StoreBackend::Supabase),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub session_jwt_secret: String,
    pub session_ttl_hours: i64,
    pub store_backend: StoreBackend,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub doctor_seed_path: Option<PathBuf>,
    pub admin_username: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            session_jwt_secret: env::var("SESSION_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SESSION_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|raw| match raw.parse::<i64>() {
                    Ok(hours) if hours > 0 => Some(hours),
                    _ => {
                        warn!("SESSION_TTL_HOURS '{}' is not a positive integer, using default", raw);
                        None
                    }
                })
                .unwrap_or(12),
            store_backend: env::var("STORE_BACKEND")
                .ok()
                .and_then(|raw| match raw.parse::<StoreBackend>() {
                    Ok(backend) => Some(backend),
                    Err(e) => {
                        warn!("{}, falling back to in-memory store", e);
                        None
                    }
                })
                .unwrap_or(StoreBackend::Memory),
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY").unwrap_or_default(),
            doctor_seed_path: env::var("DOCTOR_SEED_PATH").ok().map(PathBuf::from),
            admin_username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_PASSWORD not set, seeding the default admin password");
                    "admin123".to_string()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.session_jwt_secret.is_empty()
            && (self.store_backend == StoreBackend::Memory || self.is_supabase_configured())
    }

    pub fn is_supabase_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }
}

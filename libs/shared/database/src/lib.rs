pub mod error;
pub mod memory;
pub mod state;
pub mod store;
pub mod supabase;

use std::sync::Arc;

use tracing::{info, warn};

use shared_config::{AppConfig, StoreBackend};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use state::AppState;
pub use store::RecordStore;
pub use supabase::{SupabaseClient, SupabaseStore};

/// Build the record store selected by the configuration.
pub fn connect(config: &AppConfig) -> Arc<dyn RecordStore> {
    match config.store_backend {
        StoreBackend::Supabase => {
            if !config.is_supabase_configured() {
                warn!("Supabase store selected without SUPABASE_URL/SUPABASE_SERVICE_KEY");
            }
            info!("Using Supabase record store at {}", config.supabase_url);
            Arc::new(SupabaseStore::new(config))
        }
        StoreBackend::Memory => {
            info!("Using in-memory record store");
            Arc::new(MemoryStore::new())
        }
    }
}

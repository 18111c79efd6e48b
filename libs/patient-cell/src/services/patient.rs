use std::sync::Arc;

use tracing::{debug, info};

use shared_database::{AppState, RecordStore};
use shared_models::{Notification, Role};

use crate::models::{PatientError, PatientSummary};

pub struct PatientService {
    store: Arc<dyn RecordStore>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn list_patients(&self) -> Result<Vec<PatientSummary>, PatientError> {
        debug!("Listing registered patients");

        let accounts = self.store.list_accounts(Role::Patient).await?;
        Ok(accounts.into_iter().map(PatientSummary::from).collect())
    }

    /// Notifications addressed to `recipient`, oldest first.
    pub async fn notifications_for(&self, recipient: &str) -> Result<Vec<Notification>, PatientError> {
        let mut notifications = self.store.notifications_for(recipient).await?;
        notifications.sort_by_key(|n| n.created_at);
        Ok(notifications)
    }

    /// Remove every notification addressed to `recipient`; returns how many went.
    pub async fn clear_notifications(&self, recipient: &str) -> Result<usize, PatientError> {
        let removed = self.store.clear_notifications(recipient).await?;
        info!("Cleared {} notifications for {}", removed, recipient);
        Ok(removed)
    }
}

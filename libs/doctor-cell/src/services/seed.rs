use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use shared_database::{RecordStore, StoreError};
use shared_models::Doctor;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read doctor seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Doctor seed file is not a valid doctor list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read a JSON array of doctor records.
pub fn load_seed_file(path: &Path) -> Result<Vec<Doctor>, SeedError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Insert each seed doctor whose identity number is not already stored.
/// Returns how many were inserted.
pub async fn seed_doctors(store: &dyn RecordStore, doctors: Vec<Doctor>) -> Result<usize, SeedError> {
    let mut inserted = 0;

    for doctor in doctors {
        if store.find_doctor(&doctor.doctor_identity_number).await?.is_some() {
            debug!("Seed doctor {} already present", doctor.doctor_identity_number);
            continue;
        }

        match store.insert_doctor(doctor).await {
            Ok(_) => inserted += 1,
            // Inserted concurrently between lookup and insert.
            Err(StoreError::Conflict(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seeded {} doctors", inserted);
    Ok(inserted)
}

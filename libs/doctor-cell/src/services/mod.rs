pub mod availability;
pub mod doctor;
pub mod seed;

pub use availability::AvailabilityService;
pub use doctor::DoctorService;
pub use seed::{load_seed_file, seed_doctors, SeedError};

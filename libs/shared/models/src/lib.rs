pub mod account;
pub mod appointment;
pub mod auth;
pub mod doctor;
pub mod error;
pub mod notification;

pub use account::Account;
pub use appointment::{Appointment, AppointmentStatus};
pub use auth::{Role, User};
pub use doctor::Doctor;
pub use error::AppError;
pub use notification::Notification;

pub mod credentials;
pub mod password;

pub use credentials::AuthService;
pub use password::PasswordService;

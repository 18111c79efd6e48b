use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use tracing::{instrument, warn};

lazy_static! {
    /// Verified against when a login names no matching account.
    static ref DECOY_HASH: Option<String> = PasswordService::hash_password("decoy-password-never-issued")
        .map_err(|e| warn!("Could not prepare decoy password hash: {}", e))
        .ok();
}

pub struct PasswordService;

impl PasswordService {
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// `Ok(false)` on a wrong password; `Err` only when `hash` is not a PHC string.
    #[instrument(skip(password, hash))]
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Run one full verification against a throwaway hash. Always `false`.
    pub fn verify_decoy(password: &str) -> bool {
        match DECOY_HASH.as_deref() {
            Some(hash) => {
                let _ = Self::verify_password(password, hash);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = PasswordService::hash_password("s3cret-pass").unwrap();
        let second = PasswordService::hash_password("s3cret-pass").unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(PasswordService::verify_password("s3cret-pass", &first).unwrap());
        assert!(!PasswordService::verify_password("wrong", &first).unwrap());
    }

    #[test]
    fn decoy_is_a_real_hash_that_never_matches() {
        let decoy = DECOY_HASH.as_deref().unwrap();
        assert!(PasswordHash::new(decoy).is_ok());
        assert!(decoy.starts_with("$argon2id$"));

        assert!(!PasswordService::verify_decoy("decoy-password-never-issued"));
        assert!(!PasswordService::verify_decoy(""));
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(PasswordService::verify_password("anything", "plain-text").is_err());
    }
}

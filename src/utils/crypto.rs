use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::{Error, Result};

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(plain: &str) -> Result<String> {
    if plain.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::BadRequest(format!(
            "La contraseña debe tener al menos {} caracteres",
            MIN_PASSWORD_LEN
        )));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))
}

/// False for a wrong password and for a stored hash that cannot be parsed.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    match PasswordHash::new(hashed) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is not a valid PHC string");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("martillo-123").unwrap();
        assert!(verify_password("martillo-123", &hash));
        assert!(!verify_password("martillo-124", &hash));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(hash_password("corta").is_err());
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("x", "not-a-hash"));
    }
}

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Prefix marking a stored password that can never match. Seeded accounts
/// get one so they cannot log in until a real password is set.
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify `password` against a stored hash. Unusable and malformed hashes
/// never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    if !is_usable(hash) {
        return false;
    }
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

/// A random placeholder that no password verifies against.
pub fn unusable_password() -> String {
    format!("{UNUSABLE_PASSWORD_PREFIX}{}", uuid::Uuid::new_v4().simple())
}

pub fn is_usable(hash: &str) -> bool {
    !hash.is_empty() && !hash.starts_with(UNUSABLE_PASSWORD_PREFIX)
}

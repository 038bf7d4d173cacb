//! Password hashing and verification helpers.

use argon2::{
    Argon2,
    password_hash::{Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hash a password with a freshly generated salt.
///
/// # Errors
/// Returns any error reported by the Argon2 hasher.
pub fn hash_password(argon2: &Argon2<'_>, pw: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(argon2.hash_password(pw.as_bytes(), &salt)?.to_string())
}

/// Verify a password against a stored hash.
///
/// An unparseable stored hash fails verification rather than panicking;
/// such a value can only come from a corrupted row.
#[must_use]
pub fn verify_password(hash: &str, pw: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(pw.as_bytes(), &parsed_hash)
        .is_ok()
}

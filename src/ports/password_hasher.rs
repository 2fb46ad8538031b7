//! Password hashing port.

use crate::domain::foundation::AuthError;

/// One-way password hashing with self-describing hash strings.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain-text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a plain-text password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; errors only for unparsable hashes.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

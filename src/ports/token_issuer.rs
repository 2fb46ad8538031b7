//! Token issuing port, used by login.

use crate::domain::foundation::{AuthError, Timestamp};
use crate::domain::user::User;

/// A signed access token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Issues access tokens that the matching `SessionValidator` accepts.
pub trait TokenIssuer: Send + Sync {
    /// Sign a token carrying the user's id, email, role and institute.
    ///
    /// # Errors
    ///
    /// - `AuthError::ServiceUnavailable` if signing fails
    fn issue(&self, user: &User) -> Result<IssuedToken, AuthError>;

    /// Lifetime of issued tokens in seconds.
    fn ttl_secs(&self) -> i64;
}

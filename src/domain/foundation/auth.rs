//! Authentication types for the domain layer.
//!
//! `AuthenticatedUser` is what the auth middleware injects after validating a
//! token. It carries the caller's role and institute so application handlers
//! can make capability decisions without another lookup.

use super::{InstituteId, Role, UserId};
use thiserror::Error;

/// Caller identity extracted from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub institute_id: InstituteId,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>, role: Role, institute_id: InstituteId) -> Self {
        Self {
            id,
            email: email.into(),
            role,
            institute_id,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// True when the caller may act on data belonging to `institute`.
    ///
    /// Admins span every institute; everyone else is confined to their own.
    pub fn can_access_institute(&self, institute: &InstituteId) -> bool {
        self.is_admin() || &self.institute_id == institute
    }

    /// ADMIN anywhere, DIRECTOR inside its own institute.
    pub fn can_manage_institute(&self, institute: &InstituteId) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Director => &self.institute_id == institute,
            _ => false,
        }
    }
}

/// Authentication errors that can occur during login or token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Email/password pair did not match.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token could not be issued or a credential could not be hashed.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

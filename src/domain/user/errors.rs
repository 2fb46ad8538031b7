//! User and role-transition errors.

use crate::domain::foundation::{DomainError, ErrorCode, Role, UserId};

/// User-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    /// User was not found.
    NotFound(UserId),
    /// The role record the user's role implies is missing (integrity fault).
    RoleRecordNotFound { user_id: UserId, role: Role },
    /// `(from, to)` is not in the role transition table.
    InvalidTransition { from: Role, to: Role },
    /// The user's role changed between planning and applying.
    ConcurrentModification(UserId),
    /// Another account already uses this email.
    EmailTaken(String),
    /// Caller lacks the capability for this operation.
    Forbidden,
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl UserError {
    pub fn not_found(id: UserId) -> Self {
        UserError::NotFound(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        UserError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        UserError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            UserError::NotFound(_) => ErrorCode::UserNotFound,
            UserError::RoleRecordNotFound { .. } => ErrorCode::RoleRecordNotFound,
            UserError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            UserError::ConcurrentModification(_) => ErrorCode::ConcurrentModification,
            UserError::EmailTaken(_) => ErrorCode::Conflict,
            UserError::Forbidden => ErrorCode::Forbidden,
            UserError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            UserError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            UserError::NotFound(id) => format!("User not found: {}", id),
            UserError::RoleRecordNotFound { user_id, role } => {
                format!("{} record missing for user {}", role, user_id)
            }
            UserError::InvalidTransition { from, to } => {
                format!("Cannot change role from {} to {}", from, to)
            }
            UserError::ConcurrentModification(id) => {
                format!("User {} was modified concurrently", id)
            }
            UserError::EmailTaken(email) => format!("Email already registered: {}", email),
            UserError::Forbidden => "Permission denied".to_string(),
            UserError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            UserError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for UserError {}

impl From<DomainError> for UserError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => UserError::Forbidden,
            ErrorCode::ValidationFailed => UserError::ValidationFailed {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            ErrorCode::Conflict => {
                UserError::EmailTaken(err.details.get("email").cloned().unwrap_or_default())
            }
            ErrorCode::ConcurrentModification => match err.details.get("user_id").map(|s| s.parse()) {
                Some(Ok(id)) => UserError::ConcurrentModification(id),
                _ => UserError::Infrastructure(err.to_string()),
            },
            _ => UserError::Infrastructure(err.to_string()),
        }
    }
}

impl From<crate::domain::foundation::ValidationError> for UserError {
    fn from(err: crate::domain::foundation::ValidationError) -> Self {
        UserError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_message_names_both_roles() {
        let err = UserError::InvalidTransition {
            from: Role::Student,
            to: Role::Director,
        };
        assert_eq!(err.message(), "Cannot change role from STUDENT to DIRECTOR");
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn concurrent_modification_from_domain_error_keeps_user() {
        let id = UserId::new();
        let err = DomainError::new(ErrorCode::ConcurrentModification, "role changed")
            .with_detail("user_id", id.to_string());
        assert_eq!(UserError::from(err), UserError::ConcurrentModification(id));
    }

    #[test]
    fn database_error_becomes_infrastructure() {
        let err = DomainError::database("connection reset");
        assert!(matches!(UserError::from(err), UserError::Infrastructure(_)));
    }
}

//! Kolb test errors.

use crate::domain::foundation::{DomainError, ErrorCode, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KolbError {
    /// Only students take the test; only staff of the institute read others' results.
    Forbidden,
    /// The student has no role record despite holding the STUDENT role.
    RoleRecordNotFound(UserId),
    /// No submission stored for this student.
    ResultNotFound(UserId),
    ValidationFailed { field: String, message: String },
    Infrastructure(String),
}

impl KolbError {
    pub fn code(&self) -> ErrorCode {
        match self {
            KolbError::Forbidden => ErrorCode::Forbidden,
            KolbError::RoleRecordNotFound(_) => ErrorCode::RoleRecordNotFound,
            KolbError::ResultNotFound(_) => ErrorCode::ResultNotFound,
            KolbError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            KolbError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            KolbError::Forbidden => "Permission denied".to_string(),
            KolbError::RoleRecordNotFound(id) => format!("Student record missing for user {}", id),
            KolbError::ResultNotFound(id) => format!("No Kolb test result for student {}", id),
            KolbError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            KolbError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for KolbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for KolbError {}

impl From<DomainError> for KolbError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => KolbError::Forbidden,
            ErrorCode::ValidationFailed => KolbError::ValidationFailed {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            _ => KolbError::Infrastructure(err.to_string()),
        }
    }
}

impl From<crate::domain::foundation::ValidationError> for KolbError {
    fn from(err: crate::domain::foundation::ValidationError) -> Self {
        KolbError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

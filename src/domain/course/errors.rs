//! Course errors.

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, SectionId, UserId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseError {
    NotFound(CourseId),
    SectionNotFound(SectionId),
    /// The user to enroll does not exist.
    UserNotFound(UserId),
    /// A member's role record is missing (integrity fault).
    RoleRecordNotFound(UserId),
    Forbidden,
    ValidationFailed { field: String, message: String },
    Infrastructure(String),
}

impl CourseError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CourseError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CourseError::NotFound(_) => ErrorCode::CourseNotFound,
            CourseError::SectionNotFound(_) => ErrorCode::SectionNotFound,
            CourseError::UserNotFound(_) => ErrorCode::UserNotFound,
            CourseError::RoleRecordNotFound(_) => ErrorCode::RoleRecordNotFound,
            CourseError::Forbidden => ErrorCode::Forbidden,
            CourseError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CourseError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            CourseError::NotFound(id) => format!("Course not found: {}", id),
            CourseError::SectionNotFound(id) => format!("Section not found: {}", id),
            CourseError::UserNotFound(id) => format!("User not found: {}", id),
            CourseError::RoleRecordNotFound(id) => format!("Role record missing for user {}", id),
            CourseError::Forbidden => "Permission denied".to_string(),
            CourseError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            CourseError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for CourseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CourseError {}

impl From<DomainError> for CourseError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => CourseError::Forbidden,
            ErrorCode::ValidationFailed => CourseError::ValidationFailed {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            ErrorCode::CourseNotFound => match detail_id(&err, "course_id") {
                Some(id) => CourseError::NotFound(id),
                None => CourseError::Infrastructure(err.to_string()),
            },
            ErrorCode::SectionNotFound => match detail_id(&err, "section_id") {
                Some(id) => CourseError::SectionNotFound(id),
                None => CourseError::Infrastructure(err.to_string()),
            },
            ErrorCode::RoleRecordNotFound => match detail_id(&err, "user_id") {
                Some(id) => CourseError::RoleRecordNotFound(id),
                None => CourseError::Infrastructure(err.to_string()),
            },
            _ => CourseError::Infrastructure(err.to_string()),
        }
    }
}

fn detail_id<T: std::str::FromStr>(err: &DomainError, key: &str) -> Option<T> {
    err.details.get(key).and_then(|s| s.parse().ok())
}

impl From<ValidationError> for CourseError {
    fn from(err: ValidationError) -> Self {
        CourseError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

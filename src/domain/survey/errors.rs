//! Survey errors.

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyError {
    CourseNotFound(CourseId),
    /// Caller is not enrolled, or may not read the summary.
    Forbidden,
    ValidationFailed { field: String, message: String },
    Infrastructure(String),
}

impl SurveyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SurveyError::CourseNotFound(_) => ErrorCode::CourseNotFound,
            SurveyError::Forbidden => ErrorCode::Forbidden,
            SurveyError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SurveyError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SurveyError::CourseNotFound(id) => format!("Course not found: {}", id),
            SurveyError::Forbidden => "Permission denied".to_string(),
            SurveyError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SurveyError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SurveyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SurveyError {}

impl From<DomainError> for SurveyError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => SurveyError::Forbidden,
            ErrorCode::ValidationFailed => SurveyError::ValidationFailed {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            _ => SurveyError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for SurveyError {
    fn from(err: ValidationError) -> Self {
        SurveyError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

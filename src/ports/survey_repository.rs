//! Survey response repository port.

use async_trait::async_trait;

use crate::domain::foundation::{CourseId, DomainError};
use crate::domain::survey::SurveyResponse;

#[async_trait]
pub trait SurveyRepository: Send + Sync {
    /// Store a response, replacing the student's earlier one for the course.
    async fn upsert(&self, response: &SurveyResponse) -> Result<(), DomainError>;

    /// All responses for a course ordered by submission time.
    async fn find_by_course(&self, course_id: &CourseId) -> Result<Vec<SurveyResponse>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survey_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SurveyRepository) {}
    }
}

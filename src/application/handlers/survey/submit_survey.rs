//! SubmitSurveyHandler - An enrolled student rates a course.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{AuthenticatedUser, CourseId, Role};
use crate::domain::survey::{SurveyError, SurveyResponse};
use crate::ports::{CourseRepository, SurveyRepository};

#[derive(Debug, Clone)]
pub struct SubmitSurveyCommand {
    pub course_id: CourseId,
    pub rating: u8,
    pub comment: Option<String>,
}

pub struct SubmitSurveyHandler {
    courses: Arc<dyn CourseRepository>,
    surveys: Arc<dyn SurveyRepository>,
}

impl SubmitSurveyHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, surveys: Arc<dyn SurveyRepository>) -> Self {
        Self { courses, surveys }
    }

    /// Replaces the student's earlier response for the course.
    pub async fn handle(&self, actor: &AuthenticatedUser, cmd: SubmitSurveyCommand) -> Result<SurveyResponse, SurveyError> {
        if actor.role != Role::Student {
            return Err(SurveyError::Forbidden);
        }
        let course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or(SurveyError::CourseNotFound(cmd.course_id))?;
        if !course.is_member(&actor.id) {
            return Err(SurveyError::Forbidden);
        }

        let response = SurveyResponse::new(cmd.course_id, actor.id, cmd.rating, cmd.comment.as_deref())?;
        self.surveys.upsert(&response).await?;

        info!(course_id = %cmd.course_id, student_id = %actor.id, rating = cmd.rating, "Survey answered");
        Ok(response)
    }
}

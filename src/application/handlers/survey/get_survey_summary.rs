//! GetSurveySummaryHandler - Aggregated ratings for course staff.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, CourseId};
use crate::domain::survey::{SurveyError, SurveySummary};
use crate::ports::{CourseRepository, SurveyRepository};

pub struct GetSurveySummaryHandler {
    courses: Arc<dyn CourseRepository>,
    surveys: Arc<dyn SurveyRepository>,
}

impl GetSurveySummaryHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, surveys: Arc<dyn SurveyRepository>) -> Self {
        Self { courses, surveys }
    }

    /// Owning teacher, or ADMIN/DIRECTOR over the course's institute.
    pub async fn handle(&self, actor: &AuthenticatedUser, course_id: CourseId) -> Result<SurveySummary, SurveyError> {
        let course = self
            .courses
            .find_by_id(&course_id)
            .await?
            .ok_or(SurveyError::CourseNotFound(course_id))?;
        if !course.can_be_managed_by(actor) {
            return Err(SurveyError::Forbidden);
        }
        let responses = self.surveys.find_by_course(&course_id).await?;
        Ok(SurveySummary::from_responses(course_id, &responses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{actor, enroll, seed_course, seed_user};
    use crate::domain::foundation::{InstituteId, Role};
    use crate::domain::survey::SurveyResponse;

    #[tokio::test]
    async fn owner_reads_summary_students_do_not() {
        let store = InMemoryStore::new();
        let institute = InstituteId::new();
        let teacher = seed_user(&store, "Tom", Role::Teacher, institute).await;
        let course = seed_course(&store, &teacher, "Math").await;
        let mut students = Vec::new();
        for (name, rating) in [("Sam", 4), ("Sue", 2)] {
            let student = seed_user(&store, name, Role::Student, institute).await;
            enroll(&store, &course, &student).await;
            let response = SurveyResponse::new(*course.id(), *student.id(), rating, None).unwrap();
            SurveyRepository::upsert(&store, &response).await.unwrap();
            students.push(student);
        }
        let handler = GetSurveySummaryHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));

        let summary = handler.handle(&actor(&teacher), *course.id()).await.unwrap();
        assert_eq!(summary.responses, 2);
        assert_eq!(summary.average_rating, Some(3.0));

        let result = handler.handle(&actor(&students[0]), *course.id()).await;
        assert_eq!(result.unwrap_err(), SurveyError::Forbidden);
    }
}

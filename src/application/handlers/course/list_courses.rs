//! ListCoursesHandler - Courses of the caller's institute.

use std::sync::Arc;

use crate::domain::course::{Course, CourseError};
use crate::domain::foundation::{AuthenticatedUser, Role};
use crate::ports::CourseRepository;

pub struct ListCoursesHandler {
    courses: Arc<dyn CourseRepository>,
}

impl ListCoursesHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn handle(&self, actor: &AuthenticatedUser) -> Result<Vec<Course>, CourseError> {
        let courses = self.courses.list_by_institute(&actor.institute_id).await?;
        Ok(match actor.role {
            Role::Student => courses.iter().map(Course::visible_view).collect(),
            _ => courses,
        })
    }
}

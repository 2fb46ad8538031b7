//! GetCourseHandler - Reads one course.

use std::sync::Arc;

use crate::domain::course::{Course, CourseError};
use crate::domain::foundation::{AuthenticatedUser, CourseId, Role};
use crate::ports::CourseRepository;

use super::load_course;

pub struct GetCourseHandler {
    courses: Arc<dyn CourseRepository>,
}

impl GetCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Students only see visible contents.
    pub async fn handle(&self, actor: &AuthenticatedUser, course_id: CourseId) -> Result<Course, CourseError> {
        let course = load_course(self.courses.as_ref(), &course_id).await?;
        if !actor.can_access_institute(course.institute_id()) {
            return Err(CourseError::Forbidden);
        }
        Ok(match actor.role {
            Role::Student => course.visible_view(),
            _ => course,
        })
    }
}

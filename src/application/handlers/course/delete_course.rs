//! DeleteCourseHandler - Removes a course with its whole tree.

use std::sync::Arc;
use tracing::info;

use crate::domain::course::CourseError;
use crate::domain::foundation::{AuthenticatedUser, CourseId};
use crate::ports::CourseRepository;

use super::load_course;

pub struct DeleteCourseHandler {
    courses: Arc<dyn CourseRepository>,
}

impl DeleteCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn handle(&self, actor: &AuthenticatedUser, course_id: CourseId) -> Result<(), CourseError> {
        let course = load_course(self.courses.as_ref(), &course_id).await?;
        if !course.can_be_managed_by(actor) {
            return Err(CourseError::Forbidden);
        }
        if !self.courses.delete_cascade(&course_id).await? {
            return Err(CourseError::NotFound(course_id));
        }
        info!(
            course_id = %course_id,
            members = course.members().len(),
            deleted_by = %actor.id,
            "Course deleted"
        );
        Ok(())
    }
}

//! AddSectionHandler - Appends a section to a course.

use std::sync::Arc;

use crate::domain::course::{CourseError, Section};
use crate::domain::foundation::{AuthenticatedUser, CourseId};
use crate::ports::CourseRepository;

use super::load_course;

#[derive(Debug, Clone)]
pub struct AddSectionCommand {
    pub course_id: CourseId,
    pub title: String,
}

pub struct AddSectionHandler {
    courses: Arc<dyn CourseRepository>,
}

impl AddSectionHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Owning teacher only.
    pub async fn handle(&self, actor: &AuthenticatedUser, cmd: AddSectionCommand) -> Result<Section, CourseError> {
        let course = load_course(self.courses.as_ref(), &cmd.course_id).await?;
        if !course.is_owner(&actor.id) {
            return Err(CourseError::Forbidden);
        }
        let section = Section::new(&cmd.title)?;
        self.courses.add_section(course.id(), &section).await?;
        Ok(section)
    }
}

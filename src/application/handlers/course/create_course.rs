//! CreateCourseHandler - A teacher opens a new course.

use std::sync::Arc;
use tracing::info;

use crate::domain::course::{Course, CourseError};
use crate::domain::foundation::{AuthenticatedUser, Role};
use crate::ports::CourseRepository;

#[derive(Debug, Clone)]
pub struct CreateCourseCommand {
    pub name: String,
    pub description: String,
}

pub struct CreateCourseHandler {
    courses: Arc<dyn CourseRepository>,
}

impl CreateCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// The caller becomes the owner; the course is linked on its teacher record.
    pub async fn handle(&self, actor: &AuthenticatedUser, cmd: CreateCourseCommand) -> Result<Course, CourseError> {
        if actor.role != Role::Teacher {
            return Err(CourseError::Forbidden);
        }
        let course = Course::new(actor.institute_id, actor.id, &cmd.name, &cmd.description)?;
        self.courses.create(&course).await?;

        info!(course_id = %course.id(), teacher_id = %actor.id, "Course created");
        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{actor, seed_user};
    use crate::domain::foundation::InstituteId;
    use crate::ports::RoleRecordRepository;

    fn cmd(name: &str) -> CreateCourseCommand {
        CreateCourseCommand {
            name: name.to_string(),
            description: "Intro course".to_string(),
        }
    }

    #[tokio::test]
    async fn teacher_owns_new_course_and_record_links_it() {
        let store = InMemoryStore::new();
        let teacher = seed_user(&store, "Tom", Role::Teacher, InstituteId::new()).await;
        let handler = CreateCourseHandler::new(Arc::new(store.clone()));

        let course = handler.handle(&actor(&teacher), cmd("Chemistry")).await.unwrap();

        assert!(course.is_owner(teacher.id()));
        assert_eq!(course.institute_id(), teacher.institute_id());
        let record = store.find_by_user(teacher.id()).await.unwrap().unwrap();
        assert_eq!(record.courses(), &[course.link()]);
    }

    #[tokio::test]
    async fn only_teachers_create_courses() {
        let store = InMemoryStore::new();
        let director = seed_user(&store, "Dora", Role::Director, InstituteId::new()).await;
        let handler = CreateCourseHandler::new(Arc::new(store.clone()));

        let result = handler.handle(&actor(&director), cmd("Chemistry")).await;
        assert_eq!(result.unwrap_err(), CourseError::Forbidden);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let store = InMemoryStore::new();
        let teacher = seed_user(&store, "Tom", Role::Teacher, InstituteId::new()).await;
        let handler = CreateCourseHandler::new(Arc::new(store.clone()));

        let result = handler.handle(&actor(&teacher), cmd("  ")).await;
        assert!(matches!(result, Err(CourseError::ValidationFailed { .. })));
        assert_eq!(store.course_count().await, 0);
    }
}

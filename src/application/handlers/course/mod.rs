//! Course command and query handlers.

mod add_content;
mod add_section;
mod create_course;
mod delete_course;
mod enrollment;
mod get_course;
mod list_courses;

pub use add_content::{AddContentCommand, AddContentHandler};
pub use add_section::{AddSectionCommand, AddSectionHandler};
pub use create_course::{CreateCourseCommand, CreateCourseHandler};
pub use delete_course::DeleteCourseHandler;
pub use enrollment::{EnrollStudentHandler, EnrollmentCommand, UnenrollStudentHandler};
pub use get_course::GetCourseHandler;
pub use list_courses::ListCoursesHandler;

use crate::domain::course::{Course, CourseError};
use crate::domain::foundation::CourseId;
use crate::ports::CourseRepository;

async fn load_course(courses: &dyn CourseRepository, id: &CourseId) -> Result<Course, CourseError> {
    courses.find_by_id(id).await?.ok_or(CourseError::NotFound(*id))
}

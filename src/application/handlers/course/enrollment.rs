//! Enroll and unenroll students.
//!
//! Both sides of the link (course member list and student record) are
//! written by one repository call.

use std::sync::Arc;
use tracing::info;

use crate::domain::course::CourseError;
use crate::domain::foundation::{AuthenticatedUser, CourseId, Role, UserId};
use crate::domain::user::MemberLink;
use crate::ports::{CourseRepository, UserRepository};

use super::load_course;

#[derive(Debug, Clone, Copy)]
pub struct EnrollmentCommand {
    pub course_id: CourseId,
    pub student_id: UserId,
}

pub struct EnrollStudentHandler {
    courses: Arc<dyn CourseRepository>,
    users: Arc<dyn UserRepository>,
}

impl EnrollStudentHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { courses, users }
    }

    /// Returns `false` when the student was already enrolled.
    pub async fn handle(&self, actor: &AuthenticatedUser, cmd: EnrollmentCommand) -> Result<bool, CourseError> {
        let course = load_course(self.courses.as_ref(), &cmd.course_id).await?;
        if !course.can_be_managed_by(actor) {
            return Err(CourseError::Forbidden);
        }

        let student = self
            .users
            .find_by_id(&cmd.student_id)
            .await?
            .ok_or(CourseError::UserNotFound(cmd.student_id))?;
        if student.role() != Role::Student {
            return Err(CourseError::validation("student_id", "only students can be enrolled"));
        }
        if student.institute_id() != course.institute_id() {
            return Err(CourseError::Forbidden);
        }

        let member = MemberLink::new(*student.id(), student.full_name());
        let enrolled = self.courses.add_member(course.id(), &member).await?;
        if enrolled {
            info!(course_id = %course.id(), student_id = %student.id(), "Student enrolled");
        }
        Ok(enrolled)
    }
}

pub struct UnenrollStudentHandler {
    courses: Arc<dyn CourseRepository>,
}

impl UnenrollStudentHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Returns `false` when the student was not enrolled.
    pub async fn handle(&self, actor: &AuthenticatedUser, cmd: EnrollmentCommand) -> Result<bool, CourseError> {
        let course = load_course(self.courses.as_ref(), &cmd.course_id).await?;
        if !course.can_be_managed_by(actor) {
            return Err(CourseError::Forbidden);
        }
        let removed = self.courses.remove_member(course.id(), &cmd.student_id).await?;
        if removed {
            info!(course_id = %course.id(), student_id = %cmd.student_id, "Student unenrolled");
        }
        Ok(removed)
    }
}

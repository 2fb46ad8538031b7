//! Course repository port.

use async_trait::async_trait;

use crate::domain::course::{Content, Course, Section};
use crate::domain::foundation::{CourseId, DomainError, InstituteId, SectionId, Timestamp, UserId};
use crate::domain::user::MemberLink;

/// Persistence for courses and both sides of their enrollment links.
///
/// Every mutating method is one atomic unit: member lists and role-record
/// course links are never observed out of step.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a course and link it on the owning teacher's record.
    ///
    /// # Errors
    ///
    /// - `RoleRecordNotFound` if the teacher has no teacher record
    async fn create(&self, course: &Course) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;

    /// Courses of an institute ordered by name.
    async fn list_by_institute(&self, institute: &InstituteId) -> Result<Vec<Course>, DomainError>;

    /// Ids of courses owned by `teacher`.
    async fn find_ids_by_teacher(&self, teacher: &UserId) -> Result<Vec<CourseId>, DomainError>;

    /// Ids of courses listing `member` in their member list.
    async fn find_ids_by_member(&self, member: &UserId) -> Result<Vec<CourseId>, DomainError>;

    /// Enroll a student: member link on the course, course link on the record.
    ///
    /// Returns `false` without writing if already enrolled.
    ///
    /// # Errors
    ///
    /// - `CourseNotFound` if the course is gone
    /// - `RoleRecordNotFound` if the student has no student record
    async fn add_member(&self, course_id: &CourseId, member: &MemberLink) -> Result<bool, DomainError>;

    /// Unenroll a student from both sides. Returns whether it was enrolled.
    async fn remove_member(&self, course_id: &CourseId, member: &UserId) -> Result<bool, DomainError>;

    /// # Errors
    ///
    /// - `CourseNotFound` if the course is gone
    async fn add_section(&self, course_id: &CourseId, section: &Section) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `CourseNotFound` if the course is gone
    /// - `SectionNotFound` if the section is not in the course
    async fn add_content(
        &self,
        course_id: &CourseId,
        section_id: &SectionId,
        content: &Content,
    ) -> Result<(), DomainError>;

    /// Delete a course with its sections and contents, removing its link
    /// from every member and the owner. Returns whether it existed.
    async fn delete_cascade(&self, course_id: &CourseId) -> Result<bool, DomainError>;

    /// Make every hidden content scheduled at or before `now` visible.
    ///
    /// Returns the number of contents published.
    async fn publish_due_contents(&self, now: Timestamp) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CourseRepository) {}
    }
}

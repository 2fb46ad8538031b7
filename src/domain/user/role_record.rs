//! Role-specific records.
//!
//! A user holds at most one record, and its kind matches the user's role.
//! ADMIN users have none.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{InstituteId, Role, UserId};
use crate::domain::kolb::LearningProfile;

use super::links::CourseLink;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub user_id: UserId,
    pub institute_id: InstituteId,
    pub learning_profile: Option<LearningProfile>,
    pub courses: Vec<CourseLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRecord {
    pub user_id: UserId,
    pub institute_id: InstituteId,
    pub courses: Vec<CourseLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorRecord {
    pub user_id: UserId,
    pub institute_id: InstituteId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleRecord {
    Student(StudentRecord),
    Teacher(TeacherRecord),
    Director(DirectorRecord),
}

impl RoleRecord {
    /// Fresh record for a user entering `role`, with no courses.
    ///
    /// Returns `None` for ADMIN.
    pub fn empty_for(role: Role, user_id: UserId, institute_id: InstituteId) -> Option<Self> {
        match role {
            Role::Student => Some(RoleRecord::Student(StudentRecord {
                user_id,
                institute_id,
                learning_profile: None,
                courses: Vec::new(),
            })),
            Role::Teacher => Some(RoleRecord::Teacher(TeacherRecord {
                user_id,
                institute_id,
                courses: Vec::new(),
            })),
            Role::Director => Some(RoleRecord::Director(DirectorRecord {
                user_id,
                institute_id,
            })),
            Role::Admin => None,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RoleRecord::Student(_) => Role::Student,
            RoleRecord::Teacher(_) => Role::Teacher,
            RoleRecord::Director(_) => Role::Director,
        }
    }

    pub fn user_id(&self) -> &UserId {
        match self {
            RoleRecord::Student(r) => &r.user_id,
            RoleRecord::Teacher(r) => &r.user_id,
            RoleRecord::Director(r) => &r.user_id,
        }
    }

    pub fn institute_id(&self) -> &InstituteId {
        match self {
            RoleRecord::Student(r) => &r.institute_id,
            RoleRecord::Teacher(r) => &r.institute_id,
            RoleRecord::Director(r) => &r.institute_id,
        }
    }

    /// Enrolled courses for a student, owned courses for a teacher.
    pub fn courses(&self) -> &[CourseLink] {
        match self {
            RoleRecord::Student(r) => &r.courses,
            RoleRecord::Teacher(r) => &r.courses,
            RoleRecord::Director(_) => &[],
        }
    }

    pub fn courses_mut(&mut self) -> Option<&mut Vec<CourseLink>> {
        match self {
            RoleRecord::Student(r) => Some(&mut r.courses),
            RoleRecord::Teacher(r) => Some(&mut r.courses),
            RoleRecord::Director(_) => None,
        }
    }

    pub fn learning_profile(&self) -> Option<LearningProfile> {
        match self {
            RoleRecord::Student(r) => r.learning_profile,
            _ => None,
        }
    }
}

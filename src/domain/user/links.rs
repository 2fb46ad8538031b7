//! Denormalised enrollment links.
//!
//! A course stores `MemberLink`s for its students; each student or teacher
//! record stores `CourseLink`s for its courses. Both sides are written in the
//! same atomic unit.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, UserId};

/// Reference from a role record to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseLink {
    pub id: CourseId,
    pub course_name: String,
}

impl CourseLink {
    pub fn new(id: CourseId, course_name: impl Into<String>) -> Self {
        Self {
            id,
            course_name: course_name.into(),
        }
    }
}

/// Reference from a course to one of its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLink {
    pub id: UserId,
    pub name: String,
}

impl MemberLink {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Adds `link` unless a link with the same course id is present.
pub fn insert_course_link(links: &mut Vec<CourseLink>, link: CourseLink) -> bool {
    if links.iter().any(|l| l.id == link.id) {
        return false;
    }
    links.push(link);
    true
}

/// Removes the link to `course`; returns whether one was present.
pub fn remove_course_link(links: &mut Vec<CourseLink>, course: &CourseId) -> bool {
    let before = links.len();
    links.retain(|l| &l.id != course);
    links.len() != before
}

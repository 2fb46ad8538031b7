//! Role transition planning.
//!
//! A role change touches several collections: the user row, the old and new
//! role records, and every course the user is tied to. The planner computes
//! all of those writes up front as a [`RoleTransitionPlan`]; a
//! `RoleTransitionStore` then applies the whole plan as one atomic unit so the
//! system ends in either the old or the new state, never in between.
//!
//! | From    | To       | Course cascade                          |
//! |---------|----------|-----------------------------------------|
//! | Student | Teacher  | remove the user from enrolled courses   |
//! | Teacher | Student  | delete every owned course               |
//! | Teacher | Director | delete every owned course               |

use crate::domain::foundation::{CourseId, Role, StateMachine, UserId};

use super::{RoleRecord, User, UserError};

/// What happens to the user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserWrite {
    /// Replace the row, provided its current role still equals `expected_role`.
    UpdateRole { user: User, expected_role: Role },
    /// Remove the row.
    Delete { user_id: UserId, expected_role: Role },
}

/// Every write a role change or account removal performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTransitionPlan {
    pub user_write: UserWrite,
    /// Role record to delete, identified by kind.
    pub drop_record: Option<Role>,
    pub create_record: Option<RoleRecord>,
    /// Courses whose member list loses this user.
    pub unenroll_from: Vec<CourseId>,
    /// Courses deleted outright with their sections and contents.
    pub delete_courses: Vec<CourseId>,
}

impl RoleTransitionPlan {
    /// Plans moving `user` to `target`.
    ///
    /// `record` is the user's current role record and `linked_courses` the
    /// courses the course collection ties to the user (enrolled for a
    /// student, owned for a teacher). Both sides are merged so a drifted
    /// link on either side is still cascaded.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` when `(user.role(), target)` is not allowed
    /// - `RoleRecordNotFound` when `record` is missing or of the wrong kind
    pub fn role_change(
        user: &User,
        record: Option<&RoleRecord>,
        target: Role,
        linked_courses: &[CourseId],
    ) -> Result<Self, UserError> {
        let from = user.role();
        from.transition_to(target)
            .map_err(|_| UserError::InvalidTransition { from, to: target })?;

        let record = required_record(user, record)?;
        let courses = merged_course_ids(record, linked_courses);

        let (unenroll_from, delete_courses) = match from {
            Role::Student => (courses, Vec::new()),
            Role::Teacher => (Vec::new(), courses),
            // Unreachable: Director and Admin have no outgoing transitions.
            Role::Director | Role::Admin => (Vec::new(), Vec::new()),
        };

        Ok(Self {
            user_write: UserWrite::UpdateRole {
                user: user.with_role(target),
                expected_role: from,
            },
            drop_record: Some(from),
            create_record: RoleRecord::empty_for(target, *user.id(), *user.institute_id()),
            unenroll_from,
            delete_courses,
        })
    }

    /// Plans deleting `user` with the same cascades as leaving its role.
    ///
    /// # Errors
    ///
    /// - `RoleRecordNotFound` when a non-admin has no matching record
    pub fn removal(
        user: &User,
        record: Option<&RoleRecord>,
        linked_courses: &[CourseId],
    ) -> Result<Self, UserError> {
        let role = user.role();
        let (drop_record, unenroll_from, delete_courses) = if role.has_record() {
            let record = required_record(user, record)?;
            let courses = merged_course_ids(record, linked_courses);
            match role {
                Role::Student => (Some(role), courses, Vec::new()),
                Role::Teacher => (Some(role), Vec::new(), courses),
                _ => (Some(role), Vec::new(), Vec::new()),
            }
        } else {
            (None, Vec::new(), Vec::new())
        };

        Ok(Self {
            user_write: UserWrite::Delete {
                user_id: *user.id(),
                expected_role: role,
            },
            drop_record,
            create_record: None,
            unenroll_from,
            delete_courses,
        })
    }

    pub fn user_id(&self) -> &UserId {
        match &self.user_write {
            UserWrite::UpdateRole { user, .. } => user.id(),
            UserWrite::Delete { user_id, .. } => user_id,
        }
    }

    /// True when the user stops being a student, which discards its Kolb
    /// result and survey answers along with the record.
    pub fn drops_student_data(&self) -> bool {
        self.drop_record == Some(Role::Student)
    }

    /// The updated user, for role changes.
    pub fn updated_user(&self) -> Option<&User> {
        match &self.user_write {
            UserWrite::UpdateRole { user, .. } => Some(user),
            UserWrite::Delete { .. } => None,
        }
    }
}

fn required_record<'a>(
    user: &User,
    record: Option<&'a RoleRecord>,
) -> Result<&'a RoleRecord, UserError> {
    match record {
        Some(record) if record.role() == user.role() && record.user_id() == user.id() => Ok(record),
        _ => Err(UserError::RoleRecordNotFound {
            user_id: *user.id(),
            role: user.role(),
        }),
    }
}

fn merged_course_ids(record: &RoleRecord, linked_courses: &[CourseId]) -> Vec<CourseId> {
    let mut ids: Vec<CourseId> = record
        .courses()
        .iter()
        .map(|link| link.id)
        .chain(linked_courses.iter().copied())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

//! User domain module.
//!
//! Accounts, role-specific records, enrollment links and the role
//! transition planner.

mod aggregate;
mod errors;
mod links;
mod role_record;
mod transition;

pub use aggregate::{normalize_email, User, MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH};
pub use errors::UserError;
pub use links::{insert_course_link, remove_course_link, CourseLink, MemberLink};
pub use role_record::{DirectorRecord, RoleRecord, StudentRecord, TeacherRecord};
pub use transition::{RoleTransitionPlan, UserWrite};

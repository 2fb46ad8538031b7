//! Courses with their member lists and section trees.

mod aggregate;
mod content;
mod errors;

pub use aggregate::{Course, MAX_DESCRIPTION_LENGTH};
pub use content::{Content, ContentKind, NewContent, Section, MAX_BODY_LENGTH, MAX_TITLE_LENGTH};
pub use errors::CourseError;

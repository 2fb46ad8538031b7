//! Foundation module - Shared domain primitives.
//!
//! Value objects, identifiers, the role enum and error types that
//! form the vocabulary of the campus domain.

mod auth;
mod errors;
mod ids;
mod role;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ContentId, CourseId, InstituteId, SectionId, SurveyResponseId, UserId};
pub use role::Role;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;

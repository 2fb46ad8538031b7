//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Each
//! handler takes the authenticated caller and makes its own capability
//! decision before touching a port.

pub mod auth;
pub mod course;
pub mod kolb;
pub mod survey;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{LoginCommand, LoginHandler, LoginResult};
pub use course::{
    AddContentCommand, AddContentHandler, AddSectionCommand, AddSectionHandler, CreateCourseCommand,
    CreateCourseHandler, DeleteCourseHandler, EnrollStudentHandler, EnrollmentCommand, GetCourseHandler,
    ListCoursesHandler, UnenrollStudentHandler,
};
pub use kolb::{GetKolbResultHandler, SubmitKolbTestCommand, SubmitKolbTestHandler};
pub use survey::{GetSurveySummaryHandler, SubmitSurveyCommand, SubmitSurveyHandler};
pub use user::{
    ChangeRoleCommand, ChangeRoleHandler, CreateUserCommand, CreateUserHandler, DeleteUserHandler,
    GetUserHandler, ListUsersHandler, ListUsersQuery, UserView,
};

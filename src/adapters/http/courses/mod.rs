//! Course HTTP adapter, including the per-course survey endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AddContentRequest, AddSectionRequest, CourseResponse, CreateCourseRequest, EnrollRequest,
    EnrollmentResponse, SubmitSurveyRequest,
};
pub use handlers::{handle_course_error, handle_survey_error, CourseApiError, SurveyApiError};
pub use routes::course_routes;

//! Axum router configuration for course endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::adapters::http::AppState;

use super::handlers::{
    add_content, add_section, create_course, delete_course, enroll_student, get_course,
    get_survey_summary, list_courses, submit_survey, unenroll_student,
};

/// Course routes, mounted at `/api/courses`.
///
/// - `POST /` / `GET /` - Create and list courses
/// - `GET /:id` / `DELETE /:id` - Read or remove one course
/// - `POST /:id/members` - Enroll a student
/// - `DELETE /:id/members/:user_id` - Unenroll a student
/// - `POST /:id/sections` - Add a section
/// - `POST /:id/sections/:section_id/contents` - Add content to a section
/// - `POST /:id/survey` / `GET /:id/survey` - Answer or summarise the survey
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:id", get(get_course).delete(delete_course))
        .route("/:id/members", post(enroll_student))
        .route("/:id/members/:user_id", delete(unenroll_student))
        .route("/:id/sections", post(add_section))
        .route("/:id/sections/:section_id/contents", post(add_content))
        .route("/:id/survey", get(get_survey_summary).post(submit_survey))
}

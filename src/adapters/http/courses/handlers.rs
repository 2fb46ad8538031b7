//! HTTP handlers for course, enrollment and survey endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::adapters::http::error::log_if_internal;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::{AppState, ErrorResponse};
use crate::application::handlers::{
    AddContentCommand, AddSectionCommand, CreateCourseCommand, EnrollmentCommand, SubmitSurveyCommand,
};
use crate::domain::course::CourseError;
use crate::domain::foundation::{CourseId, DomainError, SectionId, UserId};
use crate::domain::survey::SurveyError;

use super::dto::{
    AddContentRequest, AddSectionRequest, CourseResponse, CreateCourseRequest, EnrollRequest,
    EnrollmentResponse, SubmitSurveyRequest,
};

/// POST /api/courses
pub async fn create_course(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(request): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, CourseApiError> {
    let cmd = CreateCourseCommand {
        name: request.name,
        description: request.description,
    };
    let course = state.create_course_handler().handle(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(CourseResponse::from(&course))))
}

/// GET /api/courses
pub async fn list_courses(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<impl IntoResponse, CourseApiError> {
    let courses = state.list_courses_handler().handle(&actor).await?;
    let response: Vec<CourseResponse> = courses.iter().map(CourseResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/courses/:id
pub async fn get_course(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, CourseApiError> {
    let course = state.get_course_handler().handle(&actor, course_id).await?;
    Ok(Json(CourseResponse::from(&course)))
}

/// DELETE /api/courses/:id
pub async fn delete_course(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, CourseApiError> {
    state.delete_course_handler().handle(&actor, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/courses/:id/members
///
/// 201 when the student was added, 200 when already enrolled.
pub async fn enroll_student(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(course_id): Path<CourseId>,
    Json(request): Json<EnrollRequest>,
) -> Result<impl IntoResponse, CourseApiError> {
    let cmd = EnrollmentCommand {
        course_id,
        student_id: request.student_id,
    };
    let enrolled = state.enroll_student_handler().handle(&actor, cmd).await?;
    let status = if enrolled { StatusCode::CREATED } else { StatusCode::OK };
    let body = EnrollmentResponse {
        course_id,
        student_id: request.student_id,
        enrolled,
    };
    Ok((status, Json(body)))
}

/// DELETE /api/courses/:id/members/:user_id
pub async fn unenroll_student(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path((course_id, student_id)): Path<(CourseId, UserId)>,
) -> Result<impl IntoResponse, CourseApiError> {
    let cmd = EnrollmentCommand { course_id, student_id };
    state.unenroll_student_handler().handle(&actor, cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/courses/:id/sections
pub async fn add_section(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(course_id): Path<CourseId>,
    Json(request): Json<AddSectionRequest>,
) -> Result<impl IntoResponse, CourseApiError> {
    let cmd = AddSectionCommand {
        course_id,
        title: request.title,
    };
    let section = state.add_section_handler().handle(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

/// POST /api/courses/:id/sections/:section_id/contents
pub async fn add_content(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path((course_id, section_id)): Path<(CourseId, SectionId)>,
    Json(request): Json<AddContentRequest>,
) -> Result<impl IntoResponse, CourseApiError> {
    let cmd = AddContentCommand {
        course_id,
        section_id,
        title: request.title,
        kind: request.kind,
        body: request.body,
        visible_from: request.visible_from,
    };
    let content = state.add_content_handler().handle(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(content)))
}

/// POST /api/courses/:id/survey
pub async fn submit_survey(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(course_id): Path<CourseId>,
    Json(request): Json<SubmitSurveyRequest>,
) -> Result<impl IntoResponse, SurveyApiError> {
    let cmd = SubmitSurveyCommand {
        course_id,
        rating: request.rating,
        comment: request.comment,
    };
    let response = state.submit_survey_handler().handle(&actor, cmd).await?;
    Ok(Json(response))
}

/// GET /api/courses/:id/survey
pub async fn get_survey_summary(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, SurveyApiError> {
    let summary = state.survey_summary_handler().handle(&actor, course_id).await?;
    Ok(Json(summary))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts course errors to HTTP responses.
#[derive(Debug)]
pub struct CourseApiError(pub CourseError);

impl From<CourseError> for CourseApiError {
    fn from(err: CourseError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for CourseApiError {
    fn from(err: DomainError) -> Self {
        Self(CourseError::from(err))
    }
}

pub fn handle_course_error(err: &CourseError) -> (StatusCode, &'static str) {
    match err {
        CourseError::NotFound(_) => (StatusCode::NOT_FOUND, "COURSE_NOT_FOUND"),
        CourseError::SectionNotFound(_) => (StatusCode::NOT_FOUND, "SECTION_NOT_FOUND"),
        CourseError::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
        CourseError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
        CourseError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        CourseError::RoleRecordNotFound(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTEGRITY_FAULT"),
        CourseError::Infrastructure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for CourseApiError {
    fn into_response(self) -> Response {
        let (status, code) = handle_course_error(&self.0);
        let message = self.0.message();
        log_if_internal(status, &message);
        ErrorResponse::new(code, message).into_response_with(status)
    }
}

/// API error type that converts survey errors to HTTP responses.
#[derive(Debug)]
pub struct SurveyApiError(pub SurveyError);

impl From<SurveyError> for SurveyApiError {
    fn from(err: SurveyError) -> Self {
        Self(err)
    }
}

pub fn handle_survey_error(err: &SurveyError) -> (StatusCode, &'static str) {
    match err {
        SurveyError::CourseNotFound(_) => (StatusCode::NOT_FOUND, "COURSE_NOT_FOUND"),
        SurveyError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        SurveyError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
        SurveyError::Infrastructure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for SurveyApiError {
    fn into_response(self) -> Response {
        let (status, code) = handle_survey_error(&self.0);
        let message = self.0.message();
        log_if_internal(status, &message);
        ErrorResponse::new(code, message).into_response_with(status)
    }
}

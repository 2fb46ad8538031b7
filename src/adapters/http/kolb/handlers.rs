//! HTTP handlers for the Kolb learning-style test.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::adapters::http::error::log_if_internal;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::{AppState, ErrorResponse};
use crate::application::handlers::SubmitKolbTestCommand;
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::kolb::{AnswerMatrix, KolbError, KolbScores, KolbSubmission, LearningProfile};

/// Raw answer rows; shape and ranking are checked by [`AnswerMatrix::new`].
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitKolbRequest {
    pub answers: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KolbResultResponse {
    pub student_id: UserId,
    pub profile: LearningProfile,
    pub scores: KolbScores,
    pub answers: AnswerMatrix,
    pub submitted_at: Timestamp,
}

impl From<KolbSubmission> for KolbResultResponse {
    fn from(submission: KolbSubmission) -> Self {
        Self {
            student_id: submission.student_id,
            profile: submission.profile,
            scores: submission.scores,
            answers: submission.answers,
            submitted_at: submission.submitted_at,
        }
    }
}

/// POST /api/kolb
pub async fn submit_kolb_test(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(request): Json<SubmitKolbRequest>,
) -> Result<impl IntoResponse, KolbApiError> {
    let answers = AnswerMatrix::new(request.answers).map_err(KolbError::from)?;
    let submission = state
        .submit_kolb_handler()
        .handle(&actor, SubmitKolbTestCommand { answers })
        .await?;
    Ok(Json(KolbResultResponse::from(submission)))
}

/// GET /api/kolb/:student_id
pub async fn get_kolb_result(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(student_id): Path<UserId>,
) -> Result<impl IntoResponse, KolbApiError> {
    let submission = state.get_kolb_result_handler().handle(&actor, student_id).await?;
    Ok(Json(KolbResultResponse::from(submission)))
}

/// API error type that converts Kolb errors to HTTP responses.
#[derive(Debug)]
pub struct KolbApiError(pub KolbError);

impl From<KolbError> for KolbApiError {
    fn from(err: KolbError) -> Self {
        Self(err)
    }
}

pub fn handle_kolb_error(err: &KolbError) -> (StatusCode, &'static str) {
    match err {
        KolbError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        KolbError::ResultNotFound(_) => (StatusCode::NOT_FOUND, "RESULT_NOT_FOUND"),
        KolbError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
        KolbError::RoleRecordNotFound(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTEGRITY_FAULT"),
        KolbError::Infrastructure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for KolbApiError {
    fn into_response(self) -> Response {
        let (status, code) = handle_kolb_error(&self.0);
        let message = self.0.message();
        log_if_internal(status, &message);
        ErrorResponse::new(code, message).into_response_with(status)
    }
}

//! HTTP handlers for user endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::adapters::http::error::log_if_internal;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::{AppState, ErrorResponse};
use crate::application::handlers::{ChangeRoleCommand, CreateUserCommand, ListUsersQuery};
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserError;

use super::dto::{
    ChangeRoleRequest, CreateUserRequest, ListUsersParams, UserDetailResponse, UserResponse,
};

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, UserApiError> {
    let cmd = CreateUserCommand {
        institute_id: request.institute_id.unwrap_or(actor.institute_id),
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        password: request.password,
        role: request.role,
    };
    let user = state.create_user_handler().handle(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/users?role=&institute_id=
pub async fn list_users(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Query(params): Query<ListUsersParams>,
) -> Result<impl IntoResponse, UserApiError> {
    let query = ListUsersQuery {
        institute_id: params.institute_id,
        role: params.role,
    };
    let users = state.list_users_handler().handle(&actor, query).await?;
    let response: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<impl IntoResponse, UserApiError> {
    let view = state.get_user_handler().handle(&actor, user_id).await?;
    Ok(Json(UserDetailResponse::from(view)))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<impl IntoResponse, UserApiError> {
    state.delete_user_handler().handle(&actor, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/users/:id/role
pub async fn change_role(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(user_id): Path<UserId>,
    Json(request): Json<ChangeRoleRequest>,
) -> Result<impl IntoResponse, UserApiError> {
    let cmd = ChangeRoleCommand {
        user_id,
        role: request.role,
    };
    let user = state.change_role_handler().handle(&actor, cmd).await?;
    Ok(Json(UserResponse::from(&user)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts user errors to HTTP responses.
#[derive(Debug)]
pub struct UserApiError(pub UserError);

impl From<UserError> for UserApiError {
    fn from(err: UserError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for UserApiError {
    fn from(err: DomainError) -> Self {
        Self(UserError::from(err))
    }
}

pub fn handle_user_error(err: &UserError) -> (StatusCode, &'static str) {
    match err {
        UserError::NotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
        UserError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
        UserError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        UserError::EmailTaken(_) => (StatusCode::CONFLICT, "EMAIL_TAKEN"),
        UserError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
        UserError::ConcurrentModification(_) => (StatusCode::CONFLICT, "CONCURRENT_MODIFICATION"),
        UserError::RoleRecordNotFound { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTEGRITY_FAULT"),
        UserError::Infrastructure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for UserApiError {
    fn into_response(self) -> Response {
        let (status, code) = handle_user_error(&self.0);
        let message = self.0.message();
        log_if_internal(status, &message);
        ErrorResponse::new(code, message).into_response_with(status)
    }
}
